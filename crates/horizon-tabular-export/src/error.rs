//! Error types for the export pipeline.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that abort an export.
///
/// An aborted export never produces an artifact.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Every column is hidden, so there is nothing to export.
    #[error("no visible columns to export")]
    NoVisibleColumns,

    /// The requested filename cannot be used.
    #[error("invalid filename '{filename}': {reason}")]
    InvalidFilename {
        /// The rejected filename.
        filename: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The report geometry leaves no room for content.
    #[error("invalid report geometry: {0}")]
    InvalidGeometry(String),

    /// The delimited text writer failed.
    #[error("failed to write delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// Writing to an in-memory buffer or stream failed.
    #[error("failed to write export data: {0}")]
    Write(#[from] std::io::Error),

    /// Saving the artifact to disk failed.
    #[error("failed to save export to {path}: {source}")]
    Save {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The export panicked; caught at the pipeline boundary.
    #[error("export failed unexpectedly: {0}")]
    Panicked(String),
}

impl ExportError {
    pub(crate) fn invalid_filename(filename: &str, reason: &'static str) -> Self {
        Self::InvalidFilename {
            filename: filename.to_string(),
            reason,
        }
    }

    pub(crate) fn save(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Save {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a header image could not be used.
///
/// These never abort an export: the report is rendered without the image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageLoadError {
    /// Reading the image file failed.
    #[error("failed to read {path}: {message}")]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Error description.
        message: String,
    },

    /// Fetching the image over the network failed.
    #[error("failed to fetch image: {0}")]
    Fetch(String),

    /// The bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The load did not finish within the allowed time.
    #[error("image load timed out after {0:?}")]
    TimedOut(Duration),

    /// The loader thread could not be started or stopped without answering.
    #[error("image loader failed: {0}")]
    Worker(String),
}
