// MediaExtractor trait and common types

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::downloader::errors::FetchError;
use crate::downloader::models::ExtractedMetadata;

/// Configuration for the extraction tool
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Upper bound for a single tool run; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Explicit yt-dlp binary, skips detection
    pub ytdlp_path: Option<String>,
    /// Python interpreter expected to carry the `yt_dlp` module
    pub python: Option<String>,
}

impl ExtractorConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ytdlp_path(mut self, path: Option<String>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_python(mut self, python: Option<String>) -> Self {
        self.python = python;
        self
    }
}

/// A completed download: where the bytes landed plus what the tool reported
#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub path: PathBuf,
    pub metadata: ExtractedMetadata,
}

/// The external capability that turns a catalog URL into metadata or a file
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Check if this extractor can run at all
    fn is_available(&self) -> bool;

    /// Resolve metadata without transferring media bytes
    async fn extract_metadata(&self, url: &str) -> Result<ExtractedMetadata, FetchError>;

    /// Download best quality into a file named by `output_template`
    /// (yt-dlp template syntax) and report the resulting path.
    async fn download(&self, url: &str, output_template: &str)
        -> Result<DownloadedMedia, FetchError>;
}
