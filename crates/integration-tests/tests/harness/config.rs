//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use indexmap::IndexMap;
use ririsa_config::{
    ApiKeyConfig, AuthConfig, Config, CorsConfig, HealthConfig, ImageGenConfig, ImageGenProviderConfig,
    ImageGenProviderType, ModesConfig, ServerConfig,
};
use secrecy::SecretString;

/// Key the mock Gemini backend expects
pub const TEST_API_KEY: &str = "test-gemini-key";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config with no providers
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    ..ServerConfig::default()
                },
                imagegen: ImageGenConfig {
                    default_provider: "gemini".to_owned(),
                    providers: IndexMap::new(),
                },
                modes: ModesConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Add a Gemini provider pointed at a mock backend
    pub fn with_gemini_provider(mut self, name: &str, base_url: &str) -> Self {
        self.config.imagegen.providers.insert(
            name.to_owned(),
            ImageGenProviderConfig {
                provider_type: ImageGenProviderType::Gemini,
                api_key: Some(SecretString::from(TEST_API_KEY)),
                base_url: Some(base_url.parse().expect("valid URL")),
                model: None,
                timeout_secs: 5,
            },
        );
        self
    }

    pub fn with_default_provider(mut self, name: &str) -> Self {
        self.config.imagegen.default_provider = name.to_owned();
        self
    }

    /// Require one of the given `(name, key)` pairs on non-public paths
    pub fn with_auth(mut self, keys: &[(&str, &str)]) -> Self {
        self.config.server.auth = Some(AuthConfig {
            enabled: true,
            keys: keys
                .iter()
                .map(|(name, key)| ApiKeyConfig {
                    name: (*name).to_owned(),
                    key: SecretString::from(*key),
                })
                .collect(),
            public_paths: vec!["/health".to_owned()],
        });
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.config.server.body_limit_bytes = bytes;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn without_modes(mut self) -> Self {
        self.config.modes.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
