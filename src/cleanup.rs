use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Result;
use tracing::{debug, info};

use crate::error::PackagingError;
use crate::service::Service;

/// Artifacts a previous packaging run may have left in the service root.
pub fn artifacts(service: &Service) -> Vec<PathBuf> {
    let mut paths = vec![service.helper_file()];
    if service.config.zip_import {
        paths.push(service.requirements_zip());
    } else {
        paths.push(service.requirements_dir());
    }
    paths
}

/// Delete every artifact concurrently, then report the first failure in
/// artifact order. Artifacts that are already gone count as removed.
pub fn cleanup(service: &Service) -> Result<()> {
    info!("Removing Python requirements artifacts...");
    let paths = artifacts(service);

    let results: Vec<io::Result<()>> = thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| scope.spawn(move || remove_path(path)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("removal thread panicked")))
            })
            .collect()
    });

    for (path, result) in paths.into_iter().zip(results) {
        if let Err(source) = result {
            return Err(PackagingError::Cleanup { path, source }.into());
        }
    }
    Ok(())
}

fn remove_path(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{} already absent", path.display());
            return Ok(());
        }
        Err(err) => return Err(err),
    };
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
