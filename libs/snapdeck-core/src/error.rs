//! Error types for snapdeck-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ConvertError.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can abort a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported file in image directory: {path} (allowed: {allowed})")]
    FormatViolation { path: PathBuf, allowed: String },

    #[error("number of files must be even to form question/answer pairs, found {count}")]
    CountViolation { count: usize },

    #[error("{engine} is required for OCR but is not available: {remedy}")]
    DependencyMissing { engine: String, remedy: String },

    #[error("{path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("text recognition failed for {path}: {message}")]
    Recognition { path: PathBuf, message: String },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("sqlite error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid package: {0}")]
    InvalidPackage(String),

    #[error("invalid argument: {0}")]
    Argument(String),
}

impl ConvertError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Argument(_) => 2,
            Self::FormatViolation { .. } => 3,
            Self::CountViolation { .. } => 4,
            Self::DependencyMissing { .. } => 5,
            Self::Filesystem { .. }
            | Self::Archive(_)
            | Self::Database(_)
            | Self::Serialization(_)
            | Self::InvalidPackage(_) => 6,
            Self::Recognition { .. } => 7,
        }
    }
}
