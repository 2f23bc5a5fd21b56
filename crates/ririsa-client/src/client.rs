use reqwest::header::AUTHORIZATION;
use ririsa_core::{
    ApiResult, DEFAULT_MIME_TYPE, ErrorBody, GenerationOptions,
    codec::{strip_data_uri_prefix, to_displayable_uri},
};
use ririsa_modes::{ModePreset, ModesDatabase};
use serde::Serialize;
use url::Url;

use crate::{
    error::{ClientError, Result},
    types::{EditBody, EditImageRequest, GenerateBody, MergeBody, MergeImagesRequest},
};

const MAX_MERGE_IMAGES: usize = 2;

/// Typed client for the Ririsa gateway
#[derive(Debug, Clone)]
pub struct RirisaClient {
    base_url: Url,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl RirisaClient {
    /// Create a client for the gateway at `base_url`
    ///
    /// A path on the base URL (e.g. `/api`) is kept as a prefix for every
    /// route.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("{base_url} cannot be used as a base URL")));
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            api_key: None,
        })
    }

    /// Send `Authorization: Bearer <api_key>` with every request
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -- Images --

    pub async fn generate_image(&self, prompt: &str, options: &GenerationOptions) -> Result<ApiResult> {
        let body = GenerateBody {
            prompt,
            provider: None,
            options,
        };

        let reply = self.post("/generate-image", &body).await?;
        self.finish(reply, "Image generated")
    }

    /// Merge up to two images; extras are dropped before sending
    pub async fn merge_images(&self, request: &MergeImagesRequest) -> Result<ApiResult> {
        let images = request
            .images
            .iter()
            .take(MAX_MERGE_IMAGES)
            .map(|image| strip_data_uri_prefix(image))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let body = MergeBody {
            prompt: &request.prompt,
            images,
            model_name: request.model_name.as_deref(),
            provider: request.provider.as_deref(),
            options: &request.options,
        };

        let reply = self.post("/merge-images", &body).await?;
        self.finish(reply, "Images merged")
    }

    pub async fn edit_image(&self, request: &EditImageRequest) -> Result<ApiResult> {
        let body = EditBody {
            prompt: &request.prompt,
            image: strip_data_uri_prefix(&request.image)?,
            reference_image: request
                .reference_image
                .as_deref()
                .map(strip_data_uri_prefix)
                .transpose()?,
            provider: request.provider.as_deref(),
            options: &request.options,
        };

        let reply = self.post("/edit-image", &body).await?;
        self.finish(reply, "Image edited")
    }

    // -- Modes --

    pub async fn list_modes(&self) -> Result<ModesDatabase> {
        let response = self.request(reqwest::Method::GET, "/modes").send().await?;
        Ok(handle_error(response).await?.json().await?)
    }

    pub async fn add_mode(&self, id: &str, preset: &ModePreset) -> Result<ModesDatabase> {
        self.mode_request(reqwest::Method::POST, id, Some(preset)).await
    }

    pub async fn update_mode(&self, id: &str, preset: &ModePreset) -> Result<ModesDatabase> {
        self.mode_request(reqwest::Method::PUT, id, Some(preset)).await
    }

    pub async fn delete_mode(&self, id: &str) -> Result<ModesDatabase> {
        self.mode_request(reqwest::Method::DELETE, id, None).await
    }

    async fn mode_request(
        &self,
        method: reqwest::Method,
        id: &str,
        preset: Option<&ModePreset>,
    ) -> Result<ModesDatabase> {
        let mut builder = self.request(method, &format!("/modes/{id}"));
        if let Some(preset) = preset {
            builder = builder.json(preset);
        }

        let response = builder.send().await?;
        Ok(handle_error(response).await?.json().await?)
    }

    // -- Plumbing --

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<ApiResult> {
        let response = self.request(reqwest::Method::POST, path).json(body).send().await?;
        Ok(handle_error(response).await?.json().await?)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = make_url(&self.base_url, path);
        tracing::debug!(%method, %url, "ririsa request");

        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {key}"));
        }
        builder
    }

    /// Reject empty replies, make the image displayable, and default the text
    fn finish(&self, reply: ApiResult, default_text: &str) -> Result<ApiResult> {
        let reply = ApiResult::new(reply.text, reply.image).ok_or(ClientError::EmptyResponse)?;

        Ok(ApiResult {
            text: Some(
                reply
                    .text
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| default_text.to_string()),
            ),
            image: reply
                .image
                .map(|image| to_displayable_uri(&image, DEFAULT_MIME_TYPE, &self.base_url)),
        })
    }
}

/// Append `path` to the base URL's own path
fn make_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let joined = format!("{}{path}", base_url.path().trim_end_matches('/'));
    url.set_path(&joined);
    url
}

/// Turn a non-2xx response into [`ClientError::Api`]
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (error, message) = parse_error_body(&body);

    Err(ClientError::Api {
        status: status.as_u16(),
        error,
        message,
    })
}

/// Parse an error response body into (kind, message)
fn parse_error_body(body: &str) -> (String, String) {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| ("unknown".to_owned(), body.to_owned()),
        |parsed| (parsed.error, parsed.message),
    )
}
