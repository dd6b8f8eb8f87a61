// Common data models for resolution and retrieval

use std::path::PathBuf;

use serde::Deserialize;

use super::errors::FetchError;

/// MIME type of every catalog download (yt-dlp merges into mp4)
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Which resolution path a request takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Platform-hosted video that needs the extraction tool
    Catalog,
    /// Plain HTTP link
    Direct,
}

impl ResourceClass {
    pub fn from_catalog_flag(is_catalog: bool) -> Self {
        if is_catalog {
            Self::Catalog
        } else {
            Self::Direct
        }
    }
}

/// How much a size resolution tolerates missing data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unknown sizes resolve to 0
    #[default]
    Lenient,
    /// Unknown sizes are an error
    Strict,
}

/// One inbound call, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub url: String,
    pub resource_class: ResourceClass,
}

impl ResolutionRequest {
    pub fn new(url: impl Into<String>, resource_class: ResourceClass) -> Self {
        Self {
            url: url.into(),
            resource_class,
        }
    }

    /// Build from the loosely typed pieces an HTTP body carries.
    pub fn from_parts(url: Option<String>, is_catalog: bool) -> Result<Self, FetchError> {
        let url = url.unwrap_or_default();
        let request = Self::new(url, ResourceClass::from_catalog_flag(is_catalog));
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.url.trim().is_empty() {
            return Err(FetchError::missing_url());
        }
        Ok(())
    }
}

/// Outcome of a size resolution
#[derive(Debug, Clone, PartialEq)]
pub struct SizeResult {
    /// Size in bytes, 0 when unknown
    pub size_bytes: u64,
    pub title: Option<String>,
    pub duration_seconds: Option<f64>,
}

impl SizeResult {
    pub fn bytes(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            title: None,
            duration_seconds: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.size_bytes == 0
    }
}

/// A file materialized on disk, ready for streaming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    pub local_path: PathBuf,
    pub display_name: String,
    pub mime_type: String,
}

/// One format entry as reported by the extractor
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub format_id: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
}

impl FormatEntry {
    pub fn effective_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }
}

/// Extractor metadata; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractedMetadata {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub format_id: Option<String>,
    #[serde(deserialize_with = "lenient_formats")]
    pub formats: Vec<FormatEntry>,
    #[serde(deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
}

impl ExtractedMetadata {
    /// Parse extractor JSON, degrading wrong-typed fields to `None`.
    /// A top level that is not an object yields empty metadata.
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Format matching the extractor's chosen default, if any
    pub fn selected_format(&self) -> Option<&FormatEntry> {
        let wanted = self.format_id.as_deref()?;
        self.formats
            .iter()
            .find(|f| f.format_id.as_deref() == Some(wanted))
    }

    pub fn to_size_result(&self) -> SizeResult {
        SizeResult {
            size_bytes: select_size(self),
            title: self.title.clone(),
            duration_seconds: self.duration.filter(|d| d.is_finite() && *d >= 0.0),
        }
    }
}

/// Size precedence: selected format, then top-level size, then 0.
pub fn select_size(metadata: &ExtractedMetadata) -> u64 {
    metadata
        .selected_format()
        .and_then(FormatEntry::effective_size)
        .or(metadata.filesize)
        .or(metadata.filesize_approx)
        .unwrap_or(0)
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn lenient_formats<'de, D>(deserializer: D) -> Result<Vec<FormatEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let Some(items) = value.as_array() else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect())
}
