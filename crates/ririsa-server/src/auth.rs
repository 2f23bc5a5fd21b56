use axum::{
    Json,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{Method, StatusCode};
use ririsa_config::AuthConfig;
use ririsa_core::{ClientIdentity, ErrorBody, HttpError};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error)]
enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid API key")]
    InvalidKey,
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_type(&self) -> &str {
        "Unauthorized"
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}

/// Require a configured bearer key outside the public paths
///
/// The matched key's name is attached as a [`ClientIdentity`]. Preflight
/// requests pass through so the CORS layer can answer them.
pub async fn auth_middleware(config: AuthConfig, mut request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if request.method() == Method::OPTIONS || config.public_paths.iter().any(|p| path.starts_with(p.as_str())) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return AuthError::MissingToken.into_response();
    };

    let Some(key) = config.keys.iter().find(|key| key_matches(key.key.expose_secret(), token)) else {
        tracing::warn!(path = %request.uri().path(), "API key authentication failed");
        return AuthError::InvalidKey.into_response();
    };

    tracing::debug!(client = %key.name, "request authenticated");

    request.extensions_mut().insert(ClientIdentity {
        client_id: key.name.clone(),
    });

    next.run(request).await
}

/// Compare a presented token with a configured key in constant time
fn key_matches(expected: &str, token: &str) -> bool {
    expected.as_bytes().ct_eq(token.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_matching_is_exact() {
        assert!(key_matches("secret-1", "secret-1"));
        assert!(!key_matches("secret-1", "secret-2"));
        assert!(!key_matches("secret-1", "secret-10"));
        assert!(!key_matches("secret-1", ""));
    }
}
