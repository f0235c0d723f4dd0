//! Error types for the cache layer

use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Cache layer error types
///
/// Store failures propagate unchanged; this layer performs no retries and no
/// local recovery. A cache miss is never an error — operations return
/// `Ok(None)` for a missing key.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller attempted to store an absent value
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// No candidate in the formatter chain supports the requested type
    #[error("no formatter supports type {type_name}")]
    SerializationUnsupported {
        /// The type that could not be bound to a formatter
        type_name: &'static str,
    },

    /// Value could not be encoded to its binary payload
    #[error("failed to encode value: {0}")]
    SerializationFailed(#[from] rmp_serde::encode::Error),

    /// Stored payload does not match the requested type's expected shape
    #[error("failed to decode stored payload: {0}")]
    DeserializationFailed(String),

    /// The underlying store could not be reached
    #[error("store unreachable: {0}")]
    StoreUnavailable(#[from] reqwest::Error),

    /// The underlying store returned an error
    #[error("store error: {0}")]
    StoreError(String),

    /// Store response could not be interpreted
    #[error("invalid store response: {0}")]
    InvalidResponse(String),

    /// JSON envelope error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid connection URL
    #[error("invalid connection URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection URL is missing the mandatory logical-database selector
    #[error("connection URL must select a logical database")]
    MissingDatabase,
}
