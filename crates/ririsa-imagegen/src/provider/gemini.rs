use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use ririsa_config::ImageGenProviderConfig;
use ririsa_core::{ApiResult, GenerationOptions, ImagePayload};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ImageGenProvider, Operation};
use crate::{
    error::{ImageGenError, Result},
    http_client::http_client,
    protocol::{
        GeminiContent, GeminiErrorResponse, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse,
        InlineData, fold_parts,
    },
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when neither the request nor the provider config names one
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

const DEFAULT_TEMPERATURE: f64 = 1.0;
const DEFAULT_TOP_P: f64 = 0.95;
const DEFAULT_TOP_K: u32 = 64;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 65_536;

const REFERENCE_INSTRUCTION: &str = "This is a reference image. Use it as a guide for style and concept.";

/// Google Gemini image provider
pub struct GeminiProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: String,
    default_model: String,
}

impl GeminiProvider {
    /// Build a provider from its configuration entry
    pub fn new(name: impl Into<String>, config: &ImageGenProviderConfig) -> Result<Self> {
        let name = name.into();

        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ImageGenError::Config(format!("provider '{name}' has no api_key")))?;

        let client = http_client(Duration::from_secs(config.timeout_secs))
            .map_err(|e| ImageGenError::Config(format!("failed to build HTTP client for '{name}': {e}")))?;

        let base_url = config
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, Url::as_str)
            .trim_end_matches('/')
            .to_string();

        let default_model = config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            name,
            client,
            api_key,
            base_url,
            default_model,
        })
    }

    fn model<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        options.model.as_deref().unwrap_or(&self.default_model)
    }

    async fn send(&self, operation: Operation, parts: Vec<GeminiPart>, options: &GenerationOptions) -> Result<ApiResult> {
        let model = self.model(options);
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let request = build_request(parts, options);

        tracing::debug!(provider = %self.name, %model, %operation, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.failure(format!("request to Gemini failed: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |envelope| envelope.error.describe());

            tracing::warn!(provider = %self.name, %status, "Gemini API error");

            return Err(self.failure(format!("Gemini returned {status}: {message}")));
        }

        let response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| self.failure(format!("failed to decode Gemini response: {e}")))?;

        self.finish(operation, response)
    }

    fn finish(&self, operation: Operation, response: GeminiResponse) -> Result<ApiResult> {
        if let Some(reason) = response.finish_reason() {
            tracing::debug!(provider = %self.name, %operation, finish_reason = reason, "Gemini candidate finished");
        }

        let scanned = fold_parts(response.into_parts());
        let image = scanned.image.map(|inline| inline.data);
        let text = if image.is_some() {
            Some(scanned.text.unwrap_or_else(|| operation.fallback_text()))
        } else {
            scanned.text
        };

        if image.is_none() && text.is_some() {
            tracing::info!(provider = %self.name, %operation, "model answered without an image");
        }

        ApiResult::new(text, image).ok_or_else(|| ImageGenError::MalformedResponse {
            provider: self.name.clone(),
        })
    }

    fn failure(&self, message: String) -> ImageGenError {
        ImageGenError::ProviderOperationFailure {
            provider: self.name.clone(),
            message,
        }
    }
}

#[async_trait]
impl ImageGenProvider for GeminiProvider {
    async fn generate_image(&self, prompt: &str, options: &GenerationOptions) -> Result<ApiResult> {
        self.send(Operation::Generate, vec![GeminiPart::Text(prompt.to_string())], options)
            .await
    }

    async fn merge_images(
        &self,
        prompt: &str,
        images: &[ImagePayload],
        options: &GenerationOptions,
    ) -> Result<ApiResult> {
        let operation = Operation::Merge { images: images.len() };
        self.send(operation, merge_parts(prompt, images), options).await
    }

    async fn edit_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
        reference_image: Option<&ImagePayload>,
        options: &GenerationOptions,
    ) -> Result<ApiResult> {
        self.send(Operation::Edit, edit_parts(prompt, image, reference_image), options)
            .await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn inline(image: &ImagePayload) -> GeminiPart {
    GeminiPart::InlineData(InlineData {
        mime_type: image.mime_type().to_string(),
        data: image.raw_base64().to_string(),
    })
}

fn merge_parts(prompt: &str, images: &[ImagePayload]) -> Vec<GeminiPart> {
    let instruction = format!(
        "Look at the following {} image(s) and generate a new image based on this prompt: {prompt}",
        images.len()
    );

    std::iter::once(GeminiPart::Text(instruction))
        .chain(images.iter().map(inline))
        .collect()
}

fn edit_parts(prompt: &str, image: &ImagePayload, reference_image: Option<&ImagePayload>) -> Vec<GeminiPart> {
    let mut parts = vec![
        GeminiPart::Text(format!("Edit the following image according to this prompt: {prompt}")),
        inline(image),
    ];

    if let Some(reference) = reference_image {
        parts.push(GeminiPart::Text(REFERENCE_INSTRUCTION.to_string()));
        parts.push(inline(reference));
    }

    parts
}

fn build_request(parts: Vec<GeminiPart>, options: &GenerationOptions) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent { role: "user", parts }],
        generation_config: GeminiGenerationConfig {
            response_modalities: vec!["TEXT", "IMAGE"],
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            top_p: options.top_p.unwrap_or(DEFAULT_TOP_P),
            top_k: options.top_k.unwrap_or(DEFAULT_TOP_K),
            max_output_tokens: options.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        },
    }
}
