use serde::{Deserialize, Serialize};

use crate::downloader::{ResourceClass, SizeResult};

/// Body of `POST /download` and `POST /get-file-size`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaRequest {
    pub url: Option<String>,
    #[serde(rename = "isYouTube")]
    pub is_youtube: Option<bool>,
    /// Fail instead of reporting size 0 when the size cannot be determined
    #[serde(default)]
    pub strict: bool,
}

impl MediaRequest {
    pub fn is_catalog(&self) -> bool {
        self.is_youtube.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSizeResponse {
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl FileSizeResponse {
    /// Catalog answers always carry title and duration (empty / 0 when
    /// unknown); direct answers carry only the size.
    pub fn from_result(result: SizeResult, class: ResourceClass) -> Self {
        match class {
            ResourceClass::Catalog => Self {
                size: result.size_bytes,
                title: Some(result.title.unwrap_or_default()),
                duration: Some(result.duration_seconds.unwrap_or(0.0)),
            },
            ResourceClass::Direct => Self {
                size: result.size_bytes,
                title: None,
                duration: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
}
