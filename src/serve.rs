use std::fs;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config::ToolConfig;
use crate::helper::SERVE_SCRIPT;
use crate::service::Service;
use crate::tools::{self, Tool};
use crate::util::process::{CommandSpec, Runner};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Clone, Debug, Default)]
pub struct ServeOptions {
    pub port: Option<u16>,
    pub app: Option<String>,
}

/// Build the interpreter invocation for the dev server. `script` is the
/// on-disk location of the bundled `serve.py`.
pub fn serve_command(
    service: &Service,
    program: impl Into<std::ffi::OsString>,
    script: &std::path::Path,
    app: &str,
    port: u16,
) -> CommandSpec {
    CommandSpec::new(program)
        .args([
            script.as_os_str().to_owned(),
            service.root().as_os_str().to_owned(),
            app.into(),
            port.to_string().into(),
        ])
        .interactive()
}

/// Run the local WSGI server in the foreground with inherited stdio.
///
/// The interpreter's exit status is not inspected; once the application
/// identifier is known this always reports success.
pub fn serve<R: Runner + ?Sized>(
    service: &Service,
    options: &ServeOptions,
    tool_config: &ToolConfig,
    runner: &R,
) -> Result<()> {
    let port = options.port.unwrap_or(DEFAULT_PORT);
    let app = options
        .app
        .as_deref()
        .or(service.wsgi_app.as_deref())
        .ok_or_else(|| {
            anyhow!("no WSGI application configured; set custom.wsgi.app or pass --app")
        })?;

    let scratch = TempDir::new().context("failed to create temporary directory for serve.py")?;
    let script = scratch.path().join("serve.py");
    fs::write(&script, SERVE_SCRIPT)
        .with_context(|| format!("failed to write {}", script.display()))?;

    let program = tools::resolve(Tool::Python, &service.config.python_bin, tool_config)?;
    let spec = serve_command(service, program, &script, app, port);
    info!("Serving {app} on http://localhost:{port}");

    match runner.run(&spec) {
        Ok(output) => debug!("dev server exited with {:?}", output.code),
        Err(err) => warn!("failed to start `{}`: {err}", spec.display_program()),
    }
    Ok(())
}
