#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the Ririsa image gateway
//!
//! Normalizes images the way the browser extension and web frontend do:
//! data-URI headers are stripped before sending and replies come back as
//! displayable URIs.

mod client;
pub mod error;
pub mod types;

pub use client::RirisaClient;
pub use error::{ClientError, Result};
pub use ririsa_core::{ApiResult, GenerationOptions};
pub use ririsa_modes::{ModePreset, ModesDatabase};
pub use types::{EditImageRequest, MergeImagesRequest};
