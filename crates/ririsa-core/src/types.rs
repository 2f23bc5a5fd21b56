use serde::{Deserialize, Serialize};

/// Outcome of an image operation
///
/// At least one of `text` and `image` is present; see [`ApiResult::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResult {
    /// Description or refusal text from the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Raw base64 image body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ApiResult {
    /// Build a result, returning `None` when both parts are missing
    pub fn new(text: Option<String>, image: Option<String>) -> Option<Self> {
        if text.is_none() && image.is_none() {
            return None;
        }
        Some(Self { text, image })
    }

    /// Text-only result, used when the model declines to draw
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }
}

/// Generation parameters forwarded to the provider
///
/// Every field is optional; providers fill in their own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, alias = "top_p", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling
    #[serde(default, alias = "top_k", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Maximum output tokens
    #[serde(default, alias = "max_output_tokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
    /// Replace the model when `model` is set
    #[must_use]
    pub fn with_model_override(mut self, model: Option<String>) -> Self {
        if model.is_some() {
            self.model = model;
        }
        self
    }
}
