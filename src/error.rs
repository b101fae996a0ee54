//! Error types for the export engine

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting or analyzing a resume
#[derive(Error, Debug)]
pub enum Error {
    /// The target surface node was not supplied
    #[error("Element not found")]
    ElementNotFound,

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the output document
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Upload to the analysis endpoint failed
    #[error("Upload failed: {0}")]
    UploadError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
