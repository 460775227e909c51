use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::config::ToolConfig;

/// External programs the plugin shells out to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tool {
    Pip,
    Docker,
    Python,
}

impl Tool {
    pub fn name(self) -> &'static str {
        match self {
            Tool::Pip => "pip",
            Tool::Docker => "docker",
            Tool::Python => "python",
        }
    }

    pub fn env_key(self) -> String {
        format!("PYTHON_REQUIREMENTS_BIN_{}", self.name().to_uppercase())
    }
}

/// Resolve a tool using env override, configured path, then PATH.
///
/// `default_name` is what gets looked up on PATH; when nothing matches it
/// is returned bare so a missing tool shows up as a start failure at spawn
/// time rather than here.
pub fn resolve(tool: Tool, default_name: &str, config: &ToolConfig) -> Result<OsString> {
    let env_key = tool.env_key();
    if let Some(path) = env::var_os(&env_key) {
        let pb = PathBuf::from(path);
        if pb.exists() {
            return Ok(pb.into_os_string());
        }
        bail!("{env_key} points to non-existent binary: {}", pb.display());
    }

    let configured = match tool {
        Tool::Pip => &config.tools.pip.path,
        Tool::Docker => &config.tools.docker.path,
        Tool::Python => &config.tools.python.path,
    };
    if let Some(path) = configured {
        return Ok(path.clone().into_os_string());
    }

    if let Ok(path) = which::which(default_name) {
        return Ok(path.into_os_string());
    }

    Ok(OsString::from(default_name))
}
