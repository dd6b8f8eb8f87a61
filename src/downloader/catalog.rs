// Catalog resolver - metadata and downloads through the extraction tool

use std::sync::Arc;

use tracing::{debug, info};

use super::errors::FetchError;
use super::extractors::MediaExtractor;
use super::models::{RetrievedFile, SizeResult, Strictness, VIDEO_MIME_TYPE};
use super::storage::{display_name_for, new_request_id, DownloadStore};

/// Resolves catalog videos via a [`MediaExtractor`]
#[derive(Clone)]
pub struct CatalogResolver {
    extractor: Arc<dyn MediaExtractor>,
    store: Arc<dyn DownloadStore>,
}

impl CatalogResolver {
    pub fn new(extractor: Arc<dyn MediaExtractor>, store: Arc<dyn DownloadStore>) -> Self {
        Self { extractor, store }
    }

    /// Size, title and duration without transferring media bytes.
    pub async fn resolve_metadata(
        &self,
        url: &str,
        strictness: Strictness,
    ) -> Result<SizeResult, FetchError> {
        let metadata = self.extractor.extract_metadata(url).await?;
        let result = metadata.to_size_result();

        debug!(
            extractor = self.extractor.name(),
            format_id = ?metadata.format_id,
            size = result.size_bytes,
            "catalog metadata resolved"
        );

        if strictness == Strictness::Strict && result.is_unknown() {
            return Err(FetchError::ExtractionFailed(
                "Extractor did not report a file size".to_string(),
            ));
        }

        Ok(result)
    }

    /// Download best quality as mp4 into the shared store.
    pub async fn download_media(&self, url: &str) -> Result<RetrievedFile, FetchError> {
        self.store.ensure_ready()?;

        let request_id = new_request_id();
        let template = self.store.output_template(&request_id);

        let downloaded = self
            .extractor
            .download(url, &template)
            .await
            .map_err(|e| match e {
                FetchError::DownloadFailed(_) => e,
                other => FetchError::DownloadFailed(other.to_string()),
            })?;

        let display_name =
            display_name_for(&downloaded.path, downloaded.metadata.title.as_deref());

        info!(
            request_id = %request_id,
            path = %downloaded.path.display(),
            "catalog download complete"
        );

        Ok(RetrievedFile {
            local_path: downloaded.path,
            display_name,
            mime_type: VIDEO_MIME_TYPE.to_string(),
        })
    }
}
