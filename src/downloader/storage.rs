// Download directory management
//
// Every fetch gets its own request id baked into the output template, so two
// downloads of the same title never write the same file.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use super::errors::FetchError;

lazy_static! {
    /// ` [0123abcd]` request-id marker inserted before the extension
    static ref REQUEST_ID_RE: Regex = Regex::new(r" \[[0-9a-f]{8}\]$").unwrap();
    /// Characters that must not reach a Content-Disposition filename
    static ref UNSAFE_NAME_RE: Regex = Regex::new(r#"[\x00-\x1f\x7f/\\"]+"#).unwrap();
}

/// Where downloads land
pub trait DownloadStore: Send + Sync {
    /// Make sure the backing location exists. Safe to call on every request.
    fn ensure_ready(&self) -> Result<(), FetchError>;

    /// yt-dlp output template unique to `request_id`
    fn output_template(&self, request_id: &str) -> String;
}

/// Plain directory on local disk
#[derive(Debug, Clone)]
pub struct DownloadDir {
    root: PathBuf,
}

impl DownloadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DownloadStore for DownloadDir {
    fn ensure_ready(&self) -> Result<(), FetchError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            FetchError::Internal(format!(
                "Failed to create download directory {}: {}",
                self.root.display(),
                e
            ))
        })?;
        debug!(dir = %self.root.display(), "download directory ready");
        Ok(())
    }

    fn output_template(&self, request_id: &str) -> String {
        // %(title).150B caps the title at 150 bytes so long titles stay valid filenames
        self.root
            .join(format!("%(title).150B [{}].%(ext)s", request_id))
            .to_string_lossy()
            .into_owned()
    }
}

/// Short random id for one fetch
pub fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Name shown to the caller for a downloaded file.
///
/// Uses the file's own stem with the request id removed; falls back to the
/// resolved title, then to `video`.
pub fn display_name_for(path: &Path, title: Option<&str>) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or("mp4");

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| REQUEST_ID_RE.replace(s, "").into_owned())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| title.map(str::to_string))
        .unwrap_or_default();

    let clean = UNSAFE_NAME_RE.replace_all(&stem, "_");
    let clean = clean.trim();
    let clean = if clean.is_empty() { "video" } else { clean };

    format!("{}.{}", clean, ext)
}
