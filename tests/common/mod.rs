//! Test doubles shared by the integration tests.

#![allow(dead_code)]

pub mod media_server;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use media_relay_lib::downloader::{
    CatalogResolver, Dispatcher, DownloadDir, DownloadedMedia, ExtractedMetadata, FetchError,
    LinkProber, MediaExtractor, SizeResult, Strictness,
};
use serde_json::json;

pub const FAKE_VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 fake video payload";

/// Extractor that never leaves the process.
///
/// Metadata comes from a fixed JSON document; downloads write
/// `FAKE_VIDEO_BYTES` to the path the template resolves to.
pub struct FakeExtractor {
    pub metadata: serde_json::Value,
    pub failure: Option<String>,
    pub metadata_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn with_metadata(metadata: serde_json::Value) -> Self {
        Self {
            metadata,
            failure: None,
            metadata_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
        }
    }

    pub fn clip() -> Self {
        Self::with_metadata(json!({
            "id": "abc123",
            "title": "Clip",
            "ext": "mp4",
            "duration": 42.0,
            "format_id": "18",
            "formats": [
                {"format_id": "17", "filesize": 1000},
                {"format_id": "18", "filesize": 2_500_000}
            ]
        }))
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::clip()
        }
    }

    pub fn calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst) + self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn extract_metadata(&self, _url: &str) -> Result<ExtractedMetadata, FetchError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(FetchError::ExtractionFailed(message.clone()));
        }
        Ok(ExtractedMetadata::from_json(&self.metadata))
    }

    async fn download(
        &self,
        _url: &str,
        output_template: &str,
    ) -> Result<DownloadedMedia, FetchError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(FetchError::DownloadFailed(message.clone()));
        }

        let metadata = ExtractedMetadata::from_json(&self.metadata);
        let title = metadata.title.clone().unwrap_or_else(|| "NA".to_string());
        let path = PathBuf::from(
            output_template
                .replace("%(title).150B", &title)
                .replace("%(ext)s", "mp4"),
        );
        tokio::fs::write(&path, FAKE_VIDEO_BYTES).await?;

        Ok(DownloadedMedia { path, metadata })
    }
}

/// Prober returning a fixed size
pub struct FakeProber {
    pub size: u64,
    pub calls: AtomicUsize,
}

impl FakeProber {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkProber for FakeProber {
    async fn probe_size(
        &self,
        _url: &str,
        _strictness: Strictness,
    ) -> Result<SizeResult, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SizeResult::bytes(self.size))
    }
}

pub fn dispatcher(
    extractor: Arc<dyn MediaExtractor>,
    prober: Arc<dyn LinkProber>,
    download_dir: PathBuf,
) -> Dispatcher {
    let catalog = CatalogResolver::new(extractor, Arc::new(DownloadDir::new(download_dir)));
    Dispatcher::new(catalog, prober)
}
