/// Media references and embedded artwork
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// A reference the media sink can play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaRef {
    /// Streamable URL served by the host
    Url { url: String },

    /// Whole file embedded as base64
    Payload { data: String, mime: String },
}

impl MediaRef {
    /// Create a URL reference
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    /// Create a payload reference from raw bytes
    pub fn payload(bytes: &[u8], mime: impl Into<String>) -> Self {
        Self::Payload {
            data: STANDARD.encode(bytes),
            mime: mime.into(),
        }
    }

    /// Source string to hand to the sink
    ///
    /// URLs pass through unchanged; payloads become `data:` URIs.
    pub fn to_source(&self) -> String {
        match self {
            MediaRef::Url { url } => url.clone(),
            MediaRef::Payload { data, mime } => format!("data:{mime};base64,{data}"),
        }
    }

    /// Whether the reference points at anything at all
    pub fn is_empty(&self) -> bool {
        match self {
            MediaRef::Url { url } => url.trim().is_empty(),
            MediaRef::Payload { data, .. } => data.is_empty(),
        }
    }
}

/// Cover image extracted from a track's tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
}

impl Artwork {
    /// Create new artwork
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Get the data as a base64-encoded string
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URI suitable for an image element
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}
