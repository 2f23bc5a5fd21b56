#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Types shared by every Ririsa surface
//!
//! The image codec lives here so the gateway and the client normalize
//! payloads with the same rules.

pub mod codec;
mod context;
mod error;
mod types;

pub use codec::{CodecError, DEFAULT_MIME_TYPE, ImagePayload};
pub use context::ClientIdentity;
pub use error::{ErrorBody, HttpError};
pub use types::{ApiResult, GenerationOptions};
