//! Decoder-specific error types
//!
//! Only malformed-but-recognised data is an error. A transaction that simply
//! carries no stamp decodes to `Ok(None)`.

/// Result type for decoder operations
pub type DecoderResult<T> = Result<T, DecoderError>;

/// Decoder-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Insufficient data for {context}: need {required} bytes, have {available}")]
    InsufficientLength {
        context: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Subasset name length {declared} exceeds remaining {available} bytes")]
    SubassetLength { declared: usize, available: usize },

    #[error("Invalid OLGA file size {declared}: {available} bytes available")]
    OlgaBounds { declared: usize, available: usize },

    #[error("Stamp content is empty")]
    EmptyContent,

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decompress gzip data: {0}")]
    Decompression(std::io::Error),

    #[error("SRC-721 collaborator failed: {0}")]
    Registry(#[from] crate::errors::RegistryError),
}
