//! Packaging orchestrator and the host lifecycle hooks that drive it.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::archive;
use crate::cleanup;
use crate::config::ToolConfig;
use crate::helper;
use crate::install;
use crate::serve::{self, ServeOptions};
use crate::service::Service;
use crate::util::process::{Runner, SystemRunner};

/// Lifecycle events the plugin registers with the host framework.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hook {
    BeforeDeployArtifacts,
    RequirementsInstall,
    RequirementsClean,
}

impl Hook {
    pub const ALL: [Hook; 3] = [
        Hook::BeforeDeployArtifacts,
        Hook::RequirementsInstall,
        Hook::RequirementsClean,
    ];

    pub fn event(self) -> &'static str {
        match self {
            Hook::BeforeDeployArtifacts => "before:deploy:createDeploymentArtifacts",
            Hook::RequirementsInstall => "requirements:install:install",
            Hook::RequirementsClean => "requirements:clean:clean",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event())
    }
}

impl FromStr for Hook {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        if let Some(hook) = Hook::ALL.into_iter().find(|hook| hook.event() == value) {
            return Ok(hook);
        }
        let known = Hook::ALL
            .iter()
            .map(|hook| hook.event())
            .collect::<Vec<_>>()
            .join(", ");
        bail!("unknown lifecycle event `{value}` (expected one of: {known})");
    }
}

pub struct Plugin<R = SystemRunner> {
    service: Service,
    tools: ToolConfig,
    runner: R,
}

impl Plugin<SystemRunner> {
    pub fn new(service: Service, tools: ToolConfig) -> Self {
        Self::with_runner(service, tools, SystemRunner)
    }
}

impl<R: Runner> Plugin<R> {
    pub fn with_runner(service: Service, tools: ToolConfig, runner: R) -> Self {
        Self {
            service,
            tools,
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn copy_helper_file(&self) -> Result<()> {
        helper::copy_helper_file(&self.service).map(|_| ())
    }

    pub fn install_dependencies(&self) -> Result<bool> {
        install::install_dependencies(&self.service, &self.tools, &self.runner)
    }

    /// Install, then swap the directory for an archive in zip-import mode.
    /// In directory mode a leftover archive from an earlier run is removed.
    pub fn package_dependencies(&self) -> Result<()> {
        if !self.install_dependencies()? {
            return Ok(());
        }
        if self.service.config.zip_import {
            archive::archive_requirements(&self.service)
        } else {
            archive::remove_stale_archive(&self.service)
        }
    }

    pub fn cleanup(&self) -> Result<()> {
        cleanup::cleanup(&self.service)
    }

    pub fn serve(&self, options: &ServeOptions) -> Result<()> {
        serve::serve(&self.service, options, &self.tools, &self.runner)
    }

    /// Helper file first, then dependencies; a failure stops the sequence.
    pub fn install(&self) -> Result<()> {
        self.copy_helper_file()?;
        self.package_dependencies()
    }

    pub fn run_hook(&self, hook: Hook) -> Result<()> {
        match hook {
            Hook::BeforeDeployArtifacts | Hook::RequirementsInstall => self.install(),
            Hook::RequirementsClean => self.cleanup(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackagingError;
    use crate::service::PluginConfig;
    use crate::testing::RecordingRunner;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn plugin(root: &Path, zip_import: bool, runner: RecordingRunner) -> Plugin<RecordingRunner> {
        let config = PluginConfig {
            zip_import,
            ..PluginConfig::default()
        };
        Plugin::with_runner(Service::new(root, config), ToolConfig::default(), runner)
    }

    #[test]
    fn hook_events_round_trip() {
        for hook in Hook::ALL {
            assert_eq!(hook.event().parse::<Hook>().unwrap(), hook);
        }
    }

    #[test]
    fn unknown_hook_lists_known_events() {
        let err = "deploy:deploy".parse::<Hook>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("deploy:deploy"));
        assert!(message.contains("requirements:clean:clean"));
    }

    #[test]
    fn without_manifest_only_helper_is_created() {
        let temp = TempDir::new().unwrap();
        let plugin = plugin(temp.path(), true, RecordingRunner::succeeding());

        plugin.run_hook(Hook::BeforeDeployArtifacts).unwrap();

        assert!(temp.path().join("sitecustomize.py").is_file());
        assert!(!temp.path().join(".requirements").exists());
        assert!(!temp.path().join(".requirements.zip").exists());
        assert!(plugin.runner().calls().is_empty());
    }

    #[test]
    fn directory_mode_keeps_requirements_then_cleans_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "six\n").unwrap();
        let runner = RecordingRunner::succeeding().installing(&[("six.py", "# six\n")]);
        let plugin = plugin(temp.path(), false, runner);

        plugin.run_hook(Hook::RequirementsInstall).unwrap();
        assert!(temp.path().join(".requirements/six.py").is_file());
        assert!(!temp.path().join(".requirements.zip").exists());
        assert_eq!(plugin.runner().calls().len(), 1);

        plugin.run_hook(Hook::RequirementsClean).unwrap();
        assert!(!temp.path().join("sitecustomize.py").exists());
        assert!(!temp.path().join(".requirements").exists());
        assert!(temp.path().join("requirements.txt").exists());
    }

    #[test]
    fn archive_mode_leaves_only_the_zip() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "six\n").unwrap();
        let runner = RecordingRunner::succeeding().installing(&[("six.py", "# six\n")]);
        let plugin = plugin(temp.path(), true, runner);

        plugin.install().unwrap();
        assert!(temp.path().join(".requirements.zip").is_file());
        assert!(!temp.path().join(".requirements").exists());

        plugin.cleanup().unwrap();
        assert!(!temp.path().join("sitecustomize.py").exists());
        assert!(!temp.path().join(".requirements.zip").exists());
    }

    #[test]
    fn installer_failure_skips_archiving() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "six\n").unwrap();
        fs::create_dir(temp.path().join(".requirements")).unwrap();
        let plugin = plugin(temp.path(), true, RecordingRunner::failing(1, "conflict"));

        let err = plugin.install().unwrap_err();
        assert_eq!(err.to_string(), "conflict");
        assert!(matches!(
            err.downcast_ref::<PackagingError>(),
            Some(PackagingError::InstallerFailed { .. })
        ));
        assert!(!temp.path().join(".requirements.zip").exists());
        assert!(temp.path().join(".requirements").exists());
    }

    #[test]
    fn helper_failure_stops_before_install() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "six\n").unwrap();
        let config = PluginConfig {
            helper_path: Some(temp.path().join("missing.py")),
            ..PluginConfig::default()
        };
        let plugin = Plugin::with_runner(
            Service::new(temp.path(), config),
            ToolConfig::default(),
            RecordingRunner::succeeding(),
        );

        assert!(plugin.install().is_err());
        assert!(plugin.runner().calls().is_empty());
    }

    #[test]
    fn directory_mode_drops_archive_from_earlier_zip_run() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "six\n").unwrap();
        fs::write(temp.path().join(".requirements.zip"), b"stale").unwrap();
        let runner = RecordingRunner::succeeding().installing(&[("six.py", "# six\n")]);
        let plugin = plugin(temp.path(), false, runner);

        plugin.install().unwrap();

        assert!(temp.path().join(".requirements/six.py").is_file());
        assert!(!temp.path().join(".requirements.zip").exists());
    }
}
