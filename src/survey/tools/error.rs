use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the fatal failures of a merge run. Missing fragments,
/// duplicate classes and validation issues are reported as data instead.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when a survey fragment exists but cannot be parsed.
    #[error("malformed fragment {file}: {source}")]
    Fragment {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when a fragment manifest does not follow the expected shape.
    #[error("invalid fragment manifest: {0}")]
    Manifest(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
