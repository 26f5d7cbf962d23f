//! Error types for the logo crawler.
//!
//! Library crates use [`LogoCrawlerError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all logo crawler operations.
#[derive(Debug, thiserror::Error)]
pub enum LogoCrawlerError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a page or image.
    #[error("network error: {0}")]
    Network(String),

    /// HTML or image header parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty input list, bad value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Unexpected fault while processing one organization.
    #[error("task failed: {0}")]
    Task(String),

    /// Report rendering or export error.
    #[error("report error: {0}")]
    Report(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LogoCrawlerError>;

impl LogoCrawlerError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a task fault from any displayable message.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
