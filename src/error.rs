//! Error types for qrshape operations

use thiserror::Error;

/// Result type alias using qrshape's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrshape operations
#[derive(Error, Debug)]
pub enum Error {
    /// The encoder rejected the payload (oversized, unencodable)
    #[error("Failed to encode QR code: {0}")]
    Encode(String),

    /// Rendered symbol did not scan back to the payload it was built from
    #[error("QR verification failed: {0}")]
    Verify(String),

    /// Clipboard write denied or unsupported
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Share surface rejected the request
    #[error("Share error: {0}")]
    Share(String),

    /// Unknown field name or unparsable field value
    #[error("Invalid field: {0}")]
    Field(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::Encode(e.to_string())
    }
}
