use serde::Deserialize;

/// Mode preset endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModesConfig {
    /// Serve `/modes` routes
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}
