#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod cors;
mod env;
pub mod health;
pub mod imagegen;
mod loader;
pub mod modes;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use auth::*;
pub use cors::*;
pub use health::*;
pub use imagegen::*;
pub use modes::*;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level Ririsa configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Image generation providers
    #[serde(default)]
    pub imagegen: ImageGenConfig,
    /// Mode preset endpoints
    #[serde(default)]
    pub modes: ModesConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
