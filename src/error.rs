use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the packaging sequence.
///
/// These sit at the root of the `anyhow` chain so callers can
/// `downcast_ref::<PackagingError>()` to tell them apart.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// The installer process could not be started at all.
    #[error("failed to start `{program}`")]
    InstallerStart {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The installer ran but exited with a non-zero status. Displays the
    /// captured stderr so the installer's own message reaches the user.
    #[error("{}", render_stderr(.stderr, .code))]
    InstallerFailed { code: Option<i32>, stderr: String },

    #[error("failed to remove {} after archiving", .path.display())]
    ArchiveDirRemove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn render_stderr(stderr: &str, code: &Option<i32>) -> String {
    let trimmed = stderr.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    match code {
        Some(code) => format!("installer exited with status {code}"),
        None => "installer terminated by signal".to_string(),
    }
}
