use secrecy::SecretString;
use serde::Deserialize;

/// Bearer API key authentication
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Whether API key auth is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Accepted keys
    #[serde(default)]
    pub keys: Vec<ApiKeyConfig>,

    /// Paths that skip authentication
    ///
    /// The enabled health check path is added by the server.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

/// A named API key
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiKeyConfig {
    /// Name reported as the client identity
    pub name: String,
    /// Secret bearer token
    pub key: SecretString,
}

fn default_public_paths() -> Vec<String> {
    vec!["/health".to_string()]
}
