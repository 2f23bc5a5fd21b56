use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ririsa_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModesError>;

#[derive(Debug, Error)]
pub enum ModesError {
    #[error("mode '{0}' already exists")]
    AlreadyExists(String),

    #[error("mode '{0}' not found")]
    NotFound(String),

    #[error("mode '{0}' is built in and cannot be changed")]
    DefaultImmutable(String),

    /// Body could not be read as a mode preset
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },
}

impl HttpError for ModesError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DefaultImmutable(_) => StatusCode::FORBIDDEN,
            Self::InvalidBody { status, .. } => *status,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::AlreadyExists(_) => "ModeAlreadyExists",
            Self::NotFound(_) => "ModeNotFound",
            Self::DefaultImmutable(_) => "DefaultModeImmutable",
            Self::InvalidBody { .. } => "ValidationError",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ModesError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "mode request rejected");
        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}
