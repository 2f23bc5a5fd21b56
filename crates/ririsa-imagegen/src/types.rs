use ririsa_core::GenerationOptions;
use serde::Deserialize;

/// `POST /generate-image` body
///
/// Required fields are optional here so a missing field becomes a
/// validation error naming it instead of a generic JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateImageBody {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Provider name; the configured default when absent
    #[serde(default)]
    pub provider: Option<String>,
    /// Absent and `null` both mean provider defaults
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}

/// `POST /merge-images` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeImagesBody {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Base64 or data-URI images; only the first two are used
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Overrides `options.model`
    #[serde(default, alias = "modelName")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}

/// `POST /edit-image` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditImageBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "referenceImage")]
    pub reference_image: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}
