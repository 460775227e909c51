use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::service::Service;

/// Bundled `sitecustomize.py`; puts `.requirements` (or its zip) on `sys.path`.
pub const SITECUSTOMIZE: &str = include_str!("../templates/sitecustomize.py");

/// Bundled development server entrypoint used by `serve`.
pub const SERVE_SCRIPT: &str = include_str!("../templates/serve.py");

/// Place the import helper at the service root, overwriting any previous copy.
pub fn copy_helper_file(service: &Service) -> Result<PathBuf> {
    info!("Packaging Python requirements helper...");
    let dest = service.helper_file();

    match &service.config.helper_path {
        Some(source) => {
            let source = if source.is_absolute() {
                source.clone()
            } else {
                service.root().join(source)
            };
            fs::copy(&source, &dest).with_context(|| {
                format!(
                    "failed to copy helper {} to {}",
                    source.display(),
                    dest.display()
                )
            })?;
        }
        None => {
            fs::write(&dest, SITECUSTOMIZE)
                .with_context(|| format!("failed to write {}", dest.display()))?;
        }
    }
    Ok(dest)
}
