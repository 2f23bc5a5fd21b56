use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type so the response body has
/// one shape across the whole API.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Error kind reported in the `error` field (e.g. `ValidationError`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Error kind
    pub error: String,
    /// HTTP status code, repeated for clients that lose it
    pub status_code: u16,
    /// Human-readable message
    pub message: String,
}

impl ErrorBody {
    /// Build the body for a domain error
    pub fn from_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            error: error.error_type().to_owned(),
            status_code: error.status_code().as_u16(),
            message: error.client_message(),
        }
    }
}
