use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ririsa_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Image generation errors with their HTTP mapping
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// A required field is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Request body exceeds the configured limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The request named a provider that is not registered
    #[error("provider '{0}' is not registered")]
    ProviderNotFound(String),

    /// The configured default provider is not registered
    #[error("default provider '{0}' is not registered")]
    DefaultProviderMissing(String),

    /// The upstream call failed (transport, status, or body)
    #[error("provider '{provider}' failed: {message}")]
    ProviderOperationFailure { provider: String, message: String },

    /// The upstream answered with neither text nor an image
    #[error("provider '{provider}' returned neither text nor an image")]
    MalformedResponse { provider: String },

    /// Provider could not be constructed
    #[error("configuration error: {0}")]
    Config(String),
}

impl ImageGenError {
    /// Validation error naming the missing field
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }

    fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl HttpError for ImageGenError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::ProviderNotFound(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DefaultProviderMissing(_)
            | Self::ProviderOperationFailure { .. }
            | Self::MalformedResponse { .. }
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::PayloadTooLarge(_) => "PayloadTooLarge",
            Self::ProviderNotFound(_) | Self::DefaultProviderMissing(_) => "ProviderNotFound",
            Self::ProviderOperationFailure { .. } | Self::MalformedResponse { .. } => "ProviderOperationFailure",
            Self::Config(_) => "ConfigurationError",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Config(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ImageGenError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, "image request failed");
        } else {
            tracing::debug!(error = %self, "image request rejected");
        }

        let status = self.status_code();
        (status, Json(ErrorBody::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_client_error() {
        let err = ImageGenError::missing_field("prompt");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "prompt is required");
    }

    #[test]
    fn unknown_requested_provider_is_client_error() {
        let err = ImageGenError::ProviderNotFound("dalle".to_owned());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "ProviderNotFound");
    }

    #[test]
    fn missing_default_is_server_error() {
        let err = ImageGenError::DefaultProviderMissing("gemini".to_owned());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn operation_failure_keeps_cause() {
        let err = ImageGenError::ProviderOperationFailure {
            provider: "gemini".to_owned(),
            message: "quota exceeded".to_owned(),
        };
        let body = ErrorBody::from_error(&err);
        assert_eq!(body.status_code, 500);
        assert_eq!(body.error, "ProviderOperationFailure");
        assert!(body.message.contains("quota exceeded"));
    }

    #[test]
    fn config_details_are_hidden() {
        let err = ImageGenError::Config("bad TLS root at /etc/ssl".to_owned());
        assert_eq!(err.client_message(), "Internal server error");
    }
}
