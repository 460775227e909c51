use std::ffi::OsString;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::ToolConfig;
use crate::error::PackagingError;
use crate::service::{PluginConfig, REQUIREMENTS_DIR, REQUIREMENTS_FILE, Service};
use crate::tools::{self, Tool};
use crate::util::process::{CommandSpec, Runner};

/// Container path the service directory is mounted at for dockerized installs.
pub const CONTAINER_TASK_DIR: &str = "/var/task";

/// Program plus arguments for one installer run, before tool resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallCommand {
    pub tool: Tool,
    pub args: Vec<String>,
}

fn pip_args() -> Vec<String> {
    ["--isolated", "install", "-t", REQUIREMENTS_DIR, "-r", REQUIREMENTS_FILE]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Select the installer invocation for `config`. Pure; spawns nothing.
pub fn install_command(config: &PluginConfig, service_root: &Path) -> InstallCommand {
    if !config.dockerize_pip {
        return InstallCommand {
            tool: Tool::Pip,
            args: pip_args(),
        };
    }

    let mut args = vec![
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:{CONTAINER_TASK_DIR}:z", service_root.display()),
        config.docker_image.clone(),
        "pip".to_string(),
    ];
    args.extend(pip_args());
    InstallCommand {
        tool: Tool::Docker,
        args,
    }
}

/// Run the installer when `requirements.txt` exists.
///
/// Returns `false` without spawning anything when there is no manifest.
pub fn install_dependencies<R: Runner + ?Sized>(
    service: &Service,
    tool_config: &ToolConfig,
    runner: &R,
) -> Result<bool> {
    if !service.requirements_file().exists() {
        debug!(
            "no {} in {}, skipping install",
            REQUIREMENTS_FILE,
            service.root().display()
        );
        return Ok(false);
    }

    info!("Packaging required Python packages...");

    let command = install_command(&service.config, service.root());
    let program: OsString = tools::resolve(command.tool, command.tool.name(), tool_config)?;
    let spec = CommandSpec::new(program)
        .args(&command.args)
        .current_dir(service.root())
        .capture();
    debug!("running {} {:?}", spec.display_program(), command.args);

    let output = runner
        .run(&spec)
        .map_err(|source| PackagingError::InstallerStart {
            program: spec.display_program(),
            source,
        })?;

    if !output.success() {
        return Err(PackagingError::InstallerFailed {
            code: output.code,
            stderr: output.stderr_lossy(),
        }
        .into());
    }
    Ok(true)
}
