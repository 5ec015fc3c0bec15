use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type for bundle-stamp operations
#[derive(Error, Debug)]
pub enum StampError {
    #[error("Invalid version format: {} - expected MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]", .values.join(", "))]
    InvalidVersion { values: Vec<String> },

    #[error("New version {new} must be greater than previous version {previous}")]
    VersionNotIncreasing { new: String, previous: String },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Patched manifest is not valid YAML: {0}")]
    InvalidManifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience type alias for Results in bundle-stamp
pub type Result<T> = std::result::Result<T, StampError>;

impl StampError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        StampError::Config(msg.into())
    }

    /// Create a manifest validation error with context
    pub fn invalid_manifest(msg: impl Into<String>) -> Self {
        StampError::InvalidManifest(msg.into())
    }

    /// Classify an I/O error against the path it happened on.
    ///
    /// `NotFound` and `PermissionDenied` keep the path so the user sees which
    /// file was at fault; everything else stays a plain I/O error.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => StampError::FileNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => StampError::PermissionDenied(path.to_path_buf()),
            _ => StampError::Io(err),
        }
    }

    /// Whether this error came from version validation rather than I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StampError::InvalidVersion { .. } | StampError::VersionNotIncreasing { .. }
        )
    }
}
