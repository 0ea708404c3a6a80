use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while installing or uninstalling `epm`.
#[derive(Error, Debug)]
pub enum InstallError {
    // Download errors
    #[error("HTTP {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Download failed: {0}")]
    Transport(String),

    // Filesystem errors
    #[error("Failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the home directory of the current user")]
    HomeDirUnavailable,

    // Privilege escalation helper errors
    #[error("Privileged write to {} failed: {reason}", path.display())]
    Privileged { path: PathBuf, reason: String },
}

impl InstallError {
    /// Wraps an I/O error with the action that was attempted and the path it touched.
    pub fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result alias used by every installer module.
pub type Result<T> = std::result::Result<T, InstallError>;
