use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, ImageGenProviderType};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        tracing::debug!(
            providers = config.imagegen.providers.len(),
            default_provider = %config.imagegen.default_provider,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no provider is configured, the default provider
    /// is unknown, a provider lacks credentials, or auth has no keys
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_imagegen_config()?;
        self.validate_auth_config()?;
        Ok(())
    }

    fn validate_imagegen_config(&self) -> anyhow::Result<()> {
        let imagegen = &self.imagegen;

        if imagegen.providers.is_empty() {
            anyhow::bail!("at least one image generation provider must be configured");
        }

        if !imagegen.providers.contains_key(&imagegen.default_provider) {
            anyhow::bail!(
                "default provider '{}' is not configured under imagegen.providers",
                imagegen.default_provider
            );
        }

        for (name, provider) in &imagegen.providers {
            match provider.provider_type {
                ImageGenProviderType::Gemini => {
                    let has_key = provider
                        .api_key
                        .as_ref()
                        .is_some_and(|key| !key.expose_secret().is_empty());
                    if !has_key {
                        anyhow::bail!("API key required for image generation provider '{name}'");
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_auth_config(&self) -> anyhow::Result<()> {
        let Some(ref auth) = self.server.auth else {
            return Ok(());
        };

        if !auth.enabled {
            return Ok(());
        }

        if auth.keys.is_empty() {
            anyhow::bail!("server.auth.keys must not be empty when auth is enabled");
        }

        if let Some(key) = auth.keys.iter().find(|k| k.key.expose_secret().is_empty()) {
            anyhow::bail!("server.auth key '{}' must not be empty", key.name);
        }

        Ok(())
    }
}
