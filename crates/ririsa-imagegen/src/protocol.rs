//! Gemini `generateContent` wire format

use serde::{Deserialize, Serialize};

// -- Request types --

/// `generateContent` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation contents; image requests send a single user turn
    pub contents: Vec<GeminiContent>,
    /// Sampling and modality configuration
    pub generation_config: GeminiGenerationConfig,
}

/// A single turn of content
#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent {
    /// Always `user` for outbound requests
    pub role: &'static str,
    /// Ordered text and image parts
    pub parts: Vec<GeminiPart>,
}

/// Outbound content part
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GeminiPart {
    /// Text instruction
    Text(String),
    /// Inline image
    InlineData(InlineData),
}

/// Inline binary data tagged with its media type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type (e.g. `image/png`)
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    /// Raw base64 body
    pub data: String,
}

/// Generation configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Output modalities; image models need both
    pub response_modalities: Vec<&'static str>,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Top-k sampling
    pub top_k: u32,
    /// Maximum output tokens
    pub max_output_tokens: u32,
}

// -- Response types --

/// `generateContent` response body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// Generated candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Missing when the candidate was blocked
    #[serde(default)]
    pub content: Option<GeminiResponseContent>,
    /// Finish reason (e.g. `STOP`, `SAFETY`)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiResponseContent {
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

/// Response part as sent; at most one field is normally set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorResponse {
    pub error: GeminiErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorDetail {
    #[serde(default)]
    pub code: u32,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl GeminiErrorDetail {
    /// One-line summary, e.g. `RESOURCE_EXHAUSTED (429): quota exceeded`
    pub fn describe(&self) -> String {
        if self.status.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({}): {}", self.status, self.code, self.message)
        }
    }
}

// -- Response scanning --

/// Response part after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    /// Model text
    Text(String),
    /// Generated image
    Image(InlineData),
    /// Anything else (thoughts, function calls, empty text)
    Other,
}

impl From<WirePart> for ResponsePart {
    fn from(part: WirePart) -> Self {
        match (part.text, part.inline_data) {
            (_, Some(image)) => Self::Image(image),
            (Some(text), None) if !text.is_empty() => Self::Text(text),
            _ => Self::Other,
        }
    }
}

/// Last text and last image seen in a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedParts {
    pub text: Option<String>,
    pub image: Option<InlineData>,
}

/// Fold response parts, keeping the last part of each kind
///
/// Part order is not guaranteed, so every part is visited and later parts
/// replace earlier ones of the same kind.
pub fn fold_parts<I>(parts: I) -> ScannedParts
where
    I: IntoIterator<Item = ResponsePart>,
{
    parts.into_iter().fold(ScannedParts::default(), |acc, part| match part {
        ResponsePart::Text(text) => ScannedParts {
            text: Some(text),
            ..acc
        },
        ResponsePart::Image(image) => ScannedParts {
            image: Some(image),
            ..acc
        },
        ResponsePart::Other => acc,
    })
}

impl GeminiResponse {
    /// Finish reason of the first candidate
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Classified parts of the first candidate
    pub fn into_parts(self) -> Vec<ResponsePart> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(ResponsePart::from).collect())
            .unwrap_or_default()
    }
}
