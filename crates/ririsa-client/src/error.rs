use ririsa_core::CodecError;

/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the Ririsa client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("{status} {error}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error kind from the response body
        error: String,
        /// Human-readable error message
        message: String,
    },

    /// An image argument could not be normalized
    #[error("invalid image: {0}")]
    Codec(#[from] CodecError),

    /// Server answered with neither text nor an image
    #[error("response contained neither text nor an image")]
    EmptyResponse,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}
