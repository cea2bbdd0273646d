//! Error types for the signature pad.

use thiserror::Error;

/// Result type for signature pad operations.
pub type PadResult<T> = Result<T, PadError>;

/// Errors that can occur while configuring, exporting or validating a pad.
///
/// Drawing itself never fails; these only cover the edges where input comes
/// from outside (colour strings, config JSON, replay scripts) or where bytes
/// leave the pad (PNG encoding, the browser canvas).
#[derive(Debug, Error)]
pub enum PadError {
    /// A stroke colour could not be parsed.
    #[error("invalid stroke colour {0}")]
    InvalidColor(String),

    /// The configuration is out of range or malformed.
    #[error("invalid pad configuration: {0}")]
    InvalidConfig(String),

    /// Encoding the surface to PNG failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// The underlying drawing surface rejected an operation.
    #[error("surface error: {0}")]
    Surface(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A replay script could not be read or parsed.
    #[error("replay script error: {0}")]
    Replay(String),

    /// Submission was blocked because a required signature is missing.
    #[error("{0}")]
    SignatureRequired(String),
}

impl From<serde_json::Error> for PadError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
