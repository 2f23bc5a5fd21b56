use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Top-level image generation configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenConfig {
    /// Provider used when a request does not name one
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Image generation provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, ImageGenProviderConfig>,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: IndexMap::new(),
        }
    }
}

/// Configuration for a single image generation provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: ImageGenProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model used when the request carries none
    #[serde(default)]
    pub model: Option<String>,
    /// Transport timeout for upstream calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Supported image generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageGenProviderType {
    /// Google Gemini `generateContent`
    Gemini,
}

fn default_provider() -> String {
    "gemini".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    120
}
