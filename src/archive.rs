use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;
use tracing::info;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::PackagingError;
use crate::service::Service;

/// Write every entry under `source` into a zip at `dest`, rooted at the
/// archive top level. Returns the number of files stored.
///
/// The archive is assembled in a temporary file next to `dest` and only
/// moved into place once complete; on error `dest` is left untouched.
pub fn zip_directory(source: &Path, dest: &Path) -> Result<usize> {
    if !source.is_dir() {
        bail!("{} is not a directory", source.display());
    }
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temporary archive in {}", parent.display()))?;
    let mut writer = ZipWriter::new(BufWriter::new(staging));
    let base = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut files = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("{} escaped {}", entry.path().display(), source.display()))?;
        let name = archive_name(relative);
        let options = with_permissions(base, &entry);

        if entry.file_type().is_dir() {
            writer
                .add_directory(name, options)
                .with_context(|| format!("failed to add {} to archive", relative.display()))?;
            continue;
        }

        writer
            .start_file(name, options)
            .with_context(|| format!("failed to add {} to archive", relative.display()))?;
        let mut input = File::open(entry.path())
            .with_context(|| format!("failed to open {}", entry.path().display()))?;
        io::copy(&mut input, &mut writer)
            .with_context(|| format!("failed to compress {}", entry.path().display()))?;
        files += 1;
    }

    let staging = writer
        .finish()
        .with_context(|| format!("failed to finalize {}", dest.display()))?
        .into_inner()
        .map_err(|err| err.into_error())
        .with_context(|| format!("failed to write {}", dest.display()))?;
    staging
        .persist(dest)
        .with_context(|| format!("failed to move archive into {}", dest.display()))?;
    Ok(files)
}

fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, entry: &walkdir::DirEntry) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    match entry.metadata() {
        Ok(meta) => options.unix_permissions(meta.permissions().mode()),
        Err(_) => options,
    }
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _entry: &walkdir::DirEntry) -> SimpleFileOptions {
    options
}

/// Replace `.requirements/` with `.requirements.zip`. Only called in
/// archive mode after a successful install.
pub fn archive_requirements(service: &Service) -> Result<()> {
    let dir = service.requirements_dir();
    let dest = service.requirements_zip();
    info!("Zipping required Python packages...");

    let files = zip_directory(&dir, &dest)?;
    info!("Wrote {} ({files} files)", dest.display());

    fs::remove_dir_all(&dir).map_err(|source| PackagingError::ArchiveDirRemove {
        path: dir.clone(),
        source,
    })?;
    Ok(())
}

/// Drop a `.requirements.zip` left over from an earlier archive-mode run so
/// it cannot shadow a freshly installed `.requirements/` on `sys.path`.
pub fn remove_stale_archive(service: &Service) -> Result<()> {
    let stale = service.requirements_zip();
    match fs::remove_file(&stale) {
        Ok(()) => {
            info!("Removed stale {}", stale.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PackagingError::Cleanup {
            path: stale,
            source,
        }
        .into()),
    }
}
