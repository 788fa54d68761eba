use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Block retrieval
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// SRC-721 registry and artifact store
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Stamp decoding errors
    #[error("Decoder error: {0}")]
    Decoder(#[from] crate::decoder::DecoderError),

    /// Checkpoint errors
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),
}

/// Block source error types
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to reach the block source at all
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Block source answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Height or hash the block source does not know (yet)
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Retry limit exceeded for a fetch operation
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },

    /// Request timed out
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },

    /// Response body was not what the endpoint promises
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::ConnectionFailed(_) | FetchError::Timeout { .. } => true,
            FetchError::Http { status, .. } => *status == 429 || *status >= 500,
            FetchError::NotFound { .. }
            | FetchError::MaxRetriesExceeded { .. }
            | FetchError::InvalidResponse(_) => false,
        }
    }
}

/// Collection registry and artifact store errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Descriptor serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for block retrieval
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

// Additional From implementations for common error types
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<glob::PatternError> for AppError {
    fn from(err: glob::PatternError) -> Self {
        AppError::Config(format!("Glob pattern error: {}", err))
    }
}

impl From<glob::GlobError> for AppError {
    fn from(err: glob::GlobError) -> Self {
        AppError::Io(err.into_error())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
