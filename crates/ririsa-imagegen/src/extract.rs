use axum::{
    RequestExt as _,
    body::Body,
    extract::FromRequest,
    http::{self, Request},
};
use ririsa_core::ClientIdentity;
use serde::de::DeserializeOwned;

use crate::error::ImageGenError;

/// JSON body plus the caller's identity, if the auth layer set one
///
/// Rejections use the structured error body rather than axum's plain text.
pub struct ExtractPayload<T>(pub Option<ClientIdentity>, pub T);

impl<S, T> FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ImageGenError;

    async fn from_request(request: Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let is_json = request
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if !is_json {
            return Err(ImageGenError::Validation(
                "expected 'Content-Type: application/json'".to_string(),
            ));
        }

        let identity = request.extensions().get::<ClientIdentity>().cloned();

        let bytes = axum::body::to_bytes(request.with_limited_body().into_body(), usize::MAX)
            .await
            .map_err(|err| {
                if exceeded_limit(&err) {
                    ImageGenError::PayloadTooLarge("request body is too large".to_string())
                } else {
                    ImageGenError::Validation(format!("failed to read request body: {err}"))
                }
            })?;

        let body = serde_json::from_slice(&bytes)
            .map_err(|e| ImageGenError::Validation(format!("invalid JSON body: {e}")))?;

        Ok(Self(identity, body))
    }
}

fn exceeded_limit(err: &axum::Error) -> bool {
    std::iter::successors(std::error::Error::source(err), |e| e.source())
        .any(|source| source.is::<http_body_util::LengthLimitError>())
}
