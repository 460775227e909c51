//! Service directory and the plugin options declared in its manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const MANIFEST_NAMES: [&str; 2] = ["serverless.yml", "serverless.yaml"];
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const HELPER_FILE: &str = "sitecustomize.py";
pub const REQUIREMENTS_DIR: &str = ".requirements";
pub const REQUIREMENTS_ZIP: &str = ".requirements.zip";
pub const DEFAULT_DOCKER_IMAGE: &str = "lambci/lambda:build-python2.7";

/// `custom.pythonRequirements` in the service manifest.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    pub dockerize_pip: bool,
    pub zip_import: bool,
    pub docker_image: String,
    pub python_bin: String,
    pub helper_path: Option<PathBuf>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            dockerize_pip: false,
            zip_import: false,
            docker_image: DEFAULT_DOCKER_IMAGE.to_string(),
            python_bin: "python".to_string(),
            helper_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ServiceManifest {
    #[serde(default)]
    custom: Option<CustomSection>,
}

#[derive(Debug, Default, Deserialize)]
struct CustomSection {
    #[serde(rename = "pythonRequirements", default)]
    python_requirements: Option<PluginConfig>,
    #[serde(default)]
    wsgi: Option<WsgiSection>,
}

#[derive(Debug, Default, Deserialize)]
struct WsgiSection {
    app: Option<String>,
}

/// Root of the deployable unit. Every generated artifact lives directly
/// under it.
#[derive(Clone, Debug)]
pub struct Service {
    root: PathBuf,
    pub config: PluginConfig,
    pub wsgi_app: Option<String>,
}

impl Service {
    pub fn new(root: impl Into<PathBuf>, config: PluginConfig) -> Self {
        Self {
            root: root.into(),
            config,
            wsgi_app: None,
        }
    }

    /// Read plugin options from `serverless.yml` (or `.yaml`) under `root`.
    /// A missing or empty manifest yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let root = fs::canonicalize(root)
            .with_context(|| format!("service path {} is not accessible", root.display()))?;
        let manifest = match MANIFEST_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
        {
            Some(path) => read_manifest(&path)?,
            None => ServiceManifest::default(),
        };

        let custom = manifest.custom.unwrap_or_default();
        Ok(Self {
            root,
            config: custom.python_requirements.unwrap_or_default(),
            wsgi_app: custom.wsgi.and_then(|wsgi| wsgi.app),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn requirements_file(&self) -> PathBuf {
        self.root.join(REQUIREMENTS_FILE)
    }

    pub fn helper_file(&self) -> PathBuf {
        self.root.join(HELPER_FILE)
    }

    pub fn requirements_dir(&self) -> PathBuf {
        self.root.join(REQUIREMENTS_DIR)
    }

    pub fn requirements_zip(&self) -> PathBuf {
        self.root.join(REQUIREMENTS_ZIP)
    }
}

fn read_manifest(path: &Path) -> Result<ServiceManifest> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(ServiceManifest::default());
    }
    serde_yaml_bw::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
