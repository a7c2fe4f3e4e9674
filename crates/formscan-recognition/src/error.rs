//! Error types for the recognition layer.

use thiserror::Error;

/// Errors that can occur while scanning an image for content.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The underlying recognition engine reported a failure.
    #[error("{engine} scan failed: {reason}")]
    Engine { engine: &'static str, reason: String },

    /// A scan worker thread terminated abnormally.
    #[error("scan worker died: {0}")]
    Worker(String),

    /// Failed to parse a persisted scan dump.
    #[error("failed to parse scan dump: {0}")]
    Dump(#[from] serde_json::Error),

    /// I/O error when loading scan dumps.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Shorthand for an engine failure.
    pub fn engine(engine: &'static str, reason: impl Into<String>) -> Self {
        Self::Engine {
            engine,
            reason: reason.into(),
        }
    }
}
