pub mod gemini;

use std::fmt;

use async_trait::async_trait;
use ririsa_core::{ApiResult, GenerationOptions, ImagePayload};

use crate::error::Result;

/// Capability set every image backend implements
///
/// Image arguments are raw base64 with a MIME type; data-URI headers have
/// already been removed by the gateway.
#[async_trait]
pub trait ImageGenProvider: Send + Sync {
    /// Generate an image from text alone
    async fn generate_image(&self, prompt: &str, options: &GenerationOptions) -> Result<ApiResult>;

    /// Generate a new image from up to two source images
    async fn merge_images(
        &self,
        prompt: &str,
        images: &[ImagePayload],
        options: &GenerationOptions,
    ) -> Result<ApiResult>;

    /// Edit `image`, optionally guided by a reference image
    async fn edit_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
        reference_image: Option<&ImagePayload>,
        options: &GenerationOptions,
    ) -> Result<ApiResult>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// The three image operations, used for logging, metrics, and fallback text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Merge { images: usize },
    Edit,
}

impl Operation {
    /// Stable label for metrics
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Merge { .. } => "merge",
            Self::Edit => "edit",
        }
    }

    /// Text returned alongside an image when the model wrote none
    pub fn fallback_text(self) -> String {
        match self {
            Self::Generate => "Image generated".to_owned(),
            Self::Merge { images } => format!("New image generated from {images} image(s)"),
            Self::Edit => "Image edited".to_owned(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
