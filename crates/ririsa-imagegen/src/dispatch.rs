//! Provider registry and the single dispatch point for image operations

use std::{collections::HashMap, sync::Arc, time::Instant};

use ririsa_config::{ImageGenConfig, ImageGenProviderType};
use ririsa_core::{ApiResult, GenerationOptions, ImagePayload};
use ririsa_telemetry::ImageGenMetrics;

use crate::{
    error::{ImageGenError, Result},
    provider::{ImageGenProvider, Operation, gemini::GeminiProvider},
};

/// Most images a merge forwards; extras are dropped
pub const MAX_MERGE_IMAGES: usize = 2;

/// Named providers plus the default used when a request names none
///
/// Built once at startup and shared read-only behind an `Arc`.
pub struct DispatchService {
    providers: HashMap<String, Arc<dyn ImageGenProvider>>,
    default_provider: String,
    metrics: ImageGenMetrics,
}

impl DispatchService {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
            metrics: ImageGenMetrics::new(),
        }
    }

    /// Build a service with one provider per configured entry
    pub fn from_config(config: &ImageGenConfig) -> Result<Self> {
        let mut service = Self::new(config.default_provider.clone());

        for (name, provider_config) in &config.providers {
            let provider: Arc<dyn ImageGenProvider> = match provider_config.provider_type {
                ImageGenProviderType::Gemini => Arc::new(GeminiProvider::new(name.clone(), provider_config)?),
            };

            tracing::debug!(provider = %name, "image provider configured");
            service.register(name.clone(), provider);
        }

        Ok(service)
    }

    /// Register a provider under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn ImageGenProvider>) {
        let name = name.into();

        if self.providers.insert(name.clone(), provider).is_some() {
            tracing::warn!(provider = %name, "image provider registered twice; keeping the latest");
        }
    }

    /// Name of the provider used when a request names none
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// Registered provider names, sorted
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a provider by name, or the default when `name` is `None`
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn ImageGenProvider>> {
        match name {
            Some(name) => self
                .providers
                .get(name)
                .cloned()
                .ok_or_else(|| ImageGenError::ProviderNotFound(name.to_string())),
            None => self
                .providers
                .get(&self.default_provider)
                .cloned()
                .ok_or_else(|| ImageGenError::DefaultProviderMissing(self.default_provider.clone())),
        }
    }

    pub async fn generate_image(
        &self,
        prompt: &str,
        provider: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<ApiResult> {
        let provider = self.resolve(provider)?;
        let start = Instant::now();

        let result = provider.generate_image(prompt, options).await;
        self.observe(Operation::Generate, provider.name(), &result, start);

        result
    }

    /// Merge up to [`MAX_MERGE_IMAGES`] images
    ///
    /// With no images this is exactly [`Self::generate_image`].
    pub async fn merge_images(
        &self,
        prompt: &str,
        images: &[ImagePayload],
        provider: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<ApiResult> {
        if images.is_empty() {
            return self.generate_image(prompt, provider, options).await;
        }

        if images.len() > MAX_MERGE_IMAGES {
            tracing::debug!(received = images.len(), "dropping merge images past the limit");
        }
        let images = &images[..images.len().min(MAX_MERGE_IMAGES)];

        let provider = self.resolve(provider)?;
        let start = Instant::now();

        let result = provider.merge_images(prompt, images, options).await;
        self.observe(Operation::Merge { images: images.len() }, provider.name(), &result, start);

        result
    }

    pub async fn edit_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
        reference_image: Option<&ImagePayload>,
        provider: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<ApiResult> {
        let provider = self.resolve(provider)?;
        let start = Instant::now();

        let result = provider.edit_image(prompt, image, reference_image, options).await;
        self.observe(Operation::Edit, provider.name(), &result, start);

        result
    }

    fn observe(&self, operation: Operation, provider: &str, result: &Result<ApiResult>, start: Instant) {
        match result {
            Ok(output) => tracing::info!(
                provider,
                %operation,
                has_image = output.image.is_some(),
                elapsed_ms = start.elapsed().as_millis(),
                "image operation complete"
            ),
            Err(e) => tracing::warn!(provider, %operation, error = %e, "image operation failed"),
        }

        self.metrics.record(operation.as_str(), provider, result.is_ok(), start);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// What a stub provider was asked to do
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Generate { prompt: String },
        Merge { prompt: String, images: Vec<String> },
        Edit { prompt: String, image: String, reference: Option<String> },
    }

    /// Provider that records its calls and replies with a fixed result
    pub struct StubProvider {
        name: String,
        reply: std::result::Result<ApiResult, String>,
        pub calls: Mutex<Vec<Call>>,
    }

    impl StubProvider {
        pub fn replying(name: &str, reply: ApiResult) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: Ok(reply),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn failing(name: &str, cause: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: Err(cause.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, call: Call) -> Result<ApiResult> {
            self.calls.lock().unwrap().push(call);
            self.reply.clone().map_err(|message| ImageGenError::ProviderOperationFailure {
                provider: self.name.clone(),
                message,
            })
        }
    }

    #[async_trait]
    impl ImageGenProvider for StubProvider {
        async fn generate_image(&self, prompt: &str, _options: &GenerationOptions) -> Result<ApiResult> {
            self.answer(Call::Generate {
                prompt: prompt.to_string(),
            })
        }

        async fn merge_images(
            &self,
            prompt: &str,
            images: &[ImagePayload],
            _options: &GenerationOptions,
        ) -> Result<ApiResult> {
            self.answer(Call::Merge {
                prompt: prompt.to_string(),
                images: images.iter().map(|i| i.raw_base64().to_string()).collect(),
            })
        }

        async fn edit_image(
            &self,
            prompt: &str,
            image: &ImagePayload,
            reference_image: Option<&ImagePayload>,
            _options: &GenerationOptions,
        ) -> Result<ApiResult> {
            self.answer(Call::Edit {
                prompt: prompt.to_string(),
                image: image.raw_base64().to_string(),
                reference: reference_image.map(|r| r.raw_base64().to_string()),
            })
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    pub fn done() -> ApiResult {
        ApiResult {
            text: Some("done".to_string()),
            image: Some("QUJD".to_string()),
        }
    }

    fn service_with(stub: &Arc<StubProvider>) -> DispatchService {
        let mut service = DispatchService::new("stub");
        service.register("stub", stub.clone());
        service
    }

    fn images(data: &[&str]) -> Vec<ImagePayload> {
        data.iter().map(|d| ImagePayload::Base64((*d).to_string())).collect()
    }

    #[tokio::test]
    async fn generate_uses_default_provider() {
        let stub = StubProvider::replying("stub", done());
        let service = service_with(&stub);

        let result = service
            .generate_image("a red balloon", None, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(result, done());
        assert_eq!(
            stub.calls(),
            vec![Call::Generate {
                prompt: "a red balloon".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn merge_truncates_to_two_images() {
        let stub = StubProvider::replying("stub", done());
        let service = service_with(&stub);

        service
            .merge_images("combine", &images(&["AAAA", "BBBB", "CCCC"]), None, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(
            stub.calls(),
            vec![Call::Merge {
                prompt: "combine".to_string(),
                images: vec!["AAAA".to_string(), "BBBB".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn empty_merge_is_generate() {
        let stub = StubProvider::replying("stub", done());
        let service = service_with(&stub);

        let merged = service
            .merge_images("combine", &[], None, &GenerationOptions::default())
            .await
            .unwrap();
        let generated = service
            .generate_image("combine", None, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(merged, generated);
        let calls = stub.calls();
        assert_eq!(calls[0], calls[1]);
        assert!(matches!(calls[0], Call::Generate { .. }));
    }

    #[tokio::test]
    async fn edit_forwards_reference() {
        let stub = StubProvider::replying("stub", done());
        let service = service_with(&stub);
        let image = ImagePayload::Base64("AAAA".to_string());
        let reference = ImagePayload::Base64("BBBB".to_string());

        service
            .edit_image("hat", &image, Some(&reference), None, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(
            stub.calls(),
            vec![Call::Edit {
                prompt: "hat".to_string(),
                image: "AAAA".to_string(),
                reference: Some("BBBB".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn failure_carries_cause() {
        let stub = StubProvider::failing("stub", "quota exceeded");
        let service = service_with(&stub);

        let err = service
            .edit_image(
                "hat",
                &ImagePayload::Base64("AAAA".to_string()),
                None,
                None,
                &GenerationOptions::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ImageGenError::ProviderOperationFailure { .. }));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn resolve_unknown_name_is_not_found() {
        let service = service_with(&StubProvider::replying("stub", done()));

        assert!(matches!(
            service.resolve(Some("dalle")),
            Err(ImageGenError::ProviderNotFound(name)) if name == "dalle"
        ));
    }

    #[test]
    fn resolve_default_when_registered() {
        let service = service_with(&StubProvider::replying("stub", done()));

        assert_eq!(service.resolve(None).unwrap().name(), "stub");
        assert_eq!(service.resolve(Some("stub")).unwrap().name(), "stub");
    }

    #[test]
    fn resolve_missing_default_is_server_error() {
        let service = DispatchService::new("gemini");

        assert!(matches!(
            service.resolve(None),
            Err(ImageGenError::DefaultProviderMissing(_))
        ));
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let first = StubProvider::replying("stub", ApiResult::text_only("first"));
        let second = StubProvider::replying("stub", ApiResult::text_only("second"));

        let mut service = DispatchService::new("stub");
        service.register("stub", first.clone());
        service.register("stub", second.clone());

        let result = service
            .generate_image("x", None, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(result.text.as_deref(), Some("second"));
        assert!(first.calls().is_empty());
        assert_eq!(service.provider_names(), vec!["stub"]);
    }

    #[test]
    fn from_config_builds_gemini_providers() {
        let config: ImageGenConfig = toml::from_str(
            r#"
            default_provider = "primary"

            [providers.primary]
            type = "gemini"
            api_key = "key-1"

            [providers.backup]
            type = "gemini"
            api_key = "key-2"
            "#,
        )
        .unwrap();

        let service = DispatchService::from_config(&config).unwrap();

        assert_eq!(service.default_provider(), "primary");
        assert_eq!(service.provider_names(), vec!["backup", "primary"]);
    }
}
