//! Image payload normalization
//!
//! Images cross three boundaries (client, gateway, provider) as either raw
//! base64 or `data:<mime>;base64,<payload>` URIs. Inside the gateway and the
//! provider layer payloads are always raw base64; prefixes are added and
//! stripped only at the edges.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;
use url::Url;

/// MIME type assumed when a payload carries none
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const DATA_URI_SCHEME: &str = "data:";

/// Errors produced while normalizing image payloads
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload starts with `data:` but has no `,` separating header and body
    #[error("malformed data URI: missing ',' after the media type")]
    MalformedDataUri,
}

/// Remove a `data:` URI header, leaving the raw base64 body
///
/// Input without the `data:` scheme is returned unchanged. A `data:` prefix
/// with no comma is rejected rather than passed through.
pub fn strip_data_uri_prefix(payload: &str) -> Result<&str, CodecError> {
    if !payload.starts_with(DATA_URI_SCHEME) {
        return Ok(payload);
    }

    payload
        .split_once(',')
        .map(|(_, body)| body)
        .ok_or(CodecError::MalformedDataUri)
}

/// Turn a payload returned by the gateway into something an image element can show
///
/// Data URIs pass through, base64 gets a `data:` header, absolute paths are
/// resolved against `base_url`, and anything else is assumed to be a full URL.
pub fn to_displayable_uri(payload: &str, mime_type: &str, base_url: &Url) -> String {
    if payload.starts_with(DATA_URI_SCHEME) {
        return payload.to_owned();
    }

    if is_probably_base64(payload) {
        return format!("{DATA_URI_SCHEME}{mime_type};base64,{payload}");
    }

    if payload.starts_with('/') {
        return format!("{}{payload}", base_url.as_str().trim_end_matches('/'));
    }

    payload.to_owned()
}

/// Best-effort base64 detection
///
/// Decodes with the standard alphabet and checks that re-encoding yields the
/// same string. Short plain words such as `abcd` pass, so callers that know
/// the content type should use [`ImagePayload::parse`] instead.
pub fn is_probably_base64(s: &str) -> bool {
    STANDARD
        .decode(s)
        .is_ok_and(|bytes| STANDARD.encode(bytes) == s)
}

/// A logical image in one of its two wire encodings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Raw base64 body without any header
    Base64(String),
    /// `data:<mime_type>;base64,<data>`
    DataUri {
        /// Media type taken from the URI header
        mime_type: String,
        /// Raw base64 body
        data: String,
    },
}

impl ImagePayload {
    /// Classify a string by its prefix
    ///
    /// Unlike [`is_probably_base64`] this does not sniff the body: anything
    /// without a `data:` scheme is taken to be raw base64.
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        let Some(rest) = s.strip_prefix(DATA_URI_SCHEME) else {
            return Ok(Self::Base64(s.to_owned()));
        };

        let (header, data) = rest.split_once(',').ok_or(CodecError::MalformedDataUri)?;
        let mime_type = header
            .split(';')
            .next()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE);

        Ok(Self::DataUri {
            mime_type: mime_type.to_owned(),
            data: data.to_owned(),
        })
    }

    /// The base64 body, whichever encoding holds it
    pub fn raw_base64(&self) -> &str {
        match self {
            Self::Base64(data) | Self::DataUri { data, .. } => data,
        }
    }

    /// Media type of the image
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Base64(_) => DEFAULT_MIME_TYPE,
            Self::DataUri { mime_type, .. } => mime_type,
        }
    }
}
