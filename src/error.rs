//! Pack service error types

/// Pack service error types
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    // Catalog construction errors
    #[error("invalid catalog: {0}")]
    Catalog(String),

    #[error("pack not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Encoding errors
    /// A value could not be represented on the wire (e.g. a counter that
    /// overflows the protobuf field type).
    #[error("encoding error: {0}")]
    Encoding(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    // Client-side errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: String, message: String },
}

/// Result type alias for pack service operations
pub type Result<T> = std::result::Result<T, PackError>;
