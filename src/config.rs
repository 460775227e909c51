use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "PYTHON_REQUIREMENTS_CONFIG";

/// Per-user tool configuration (`config.toml`).
#[derive(Debug, Default, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub tools: ToolsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolsSection {
    #[serde(default)]
    pub pip: ToolEntry,
    #[serde(default)]
    pub docker: ToolEntry,
    #[serde(default)]
    pub python: ToolEntry,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolEntry {
    pub path: Option<PathBuf>,
}

pub fn load() -> Result<ToolConfig> {
    let path_override = std::env::var(CONFIG_ENV).ok();
    load_from(path_override.as_deref())
}

pub fn load_from(path_override: Option<&str>) -> Result<ToolConfig> {
    let Some(path) = config_path_override(path_override) else {
        return Ok(ToolConfig::default());
    };

    if !path.exists() {
        return Ok(ToolConfig::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: ToolConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    Ok(config)
}

fn config_path_override(path_override: Option<&str>) -> Option<PathBuf> {
    if let Some(raw) = path_override {
        return Some(PathBuf::from(raw));
    }
    config_path()
}

pub fn config_path() -> Option<PathBuf> {
    // Prefer XDG-style config path, but fall back to ~/.python-requirements/config.toml.
    if let Some(mut dir) = dirs::config_dir() {
        dir.push("python-requirements");
        dir.push("config.toml");
        if dir.exists() {
            return Some(dir);
        }
    }
    dirs::home_dir().map(|mut home| {
        home.push(".python-requirements");
        home.push("config.toml");
        home
    })
}
