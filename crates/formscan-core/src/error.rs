//! Error types for the formscan-core library.

use std::path::PathBuf;

use thiserror::Error;

use formscan_recognition::ScanError;

/// Main error type for the formscan library.
#[derive(Error, Debug)]
pub enum FormscanError {
    /// Template loading or validation error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Scan error from the recognition layer.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to template persistence.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Failed to parse a template file.
    #[error("failed to parse template {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// I/O error when reading template files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the formscan library.
pub type Result<T> = std::result::Result<T, FormscanError>;
