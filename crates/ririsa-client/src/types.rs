use ririsa_core::GenerationOptions;
use serde::Serialize;

/// Arguments for [`crate::RirisaClient::merge_images`]
#[derive(Debug, Clone, Default)]
pub struct MergeImagesRequest {
    pub prompt: String,
    /// Base64 or data-URI images; only the first two are sent
    pub images: Vec<String>,
    pub model_name: Option<String>,
    pub provider: Option<String>,
    pub options: GenerationOptions,
}

/// Arguments for [`crate::RirisaClient::edit_image`]
#[derive(Debug, Clone, Default)]
pub struct EditImageRequest {
    pub prompt: String,
    pub image: String,
    pub reference_image: Option<String>,
    pub provider: Option<String>,
    pub options: GenerationOptions,
}

// -- Wire bodies --

#[derive(Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'a str>,
    pub options: &'a GenerationOptions,
}

#[derive(Serialize)]
pub(crate) struct MergeBody<'a> {
    pub prompt: &'a str,
    pub images: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'a str>,
    pub options: &'a GenerationOptions,
}

#[derive(Serialize)]
pub(crate) struct EditBody<'a> {
    pub prompt: &'a str,
    pub image: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'a str>,
    pub options: &'a GenerationOptions,
}
