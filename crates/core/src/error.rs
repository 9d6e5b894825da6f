//! Error types for obsync-core

use std::path::PathBuf;

use thiserror::Error;

use crate::sync::TransferSummary;

/// Result type alias for obsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for obsync operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local file/directory or remote object/directory does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A local upload source has zero bytes
    #[error("Local file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    /// A file was given where a directory was expected, or vice versa
    #[error("Path type mismatch: {0}")]
    PathType(String),

    /// A path string could not be interpreted
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The retry budget for a single object was exhausted
    #[error("Transfer failed after {attempts} attempt(s): {path}: {message}")]
    Transfer {
        path: String,
        attempts: u32,
        message: String,
    },

    /// A directory operation failed according to its failure policy
    #[error("{operation} failed: {summary}")]
    AggregateTransfer {
        operation: &'static str,
        summary: TransferSummary,
    },

    /// Transport-level failure reported by the store client
    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Returns the directory summary carried by an aggregate failure
    pub fn summary(&self) -> Option<&TransferSummary> {
        match self {
            Error::AggregateTransfer { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// Returns true if this error means the target does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
