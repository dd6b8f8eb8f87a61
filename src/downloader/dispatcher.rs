// Dispatcher - routes a request to the resolver for its resource class

use std::sync::Arc;

use tracing::{error, info};

use super::catalog::CatalogResolver;
use super::errors::FetchError;
use super::models::{ResolutionRequest, ResourceClass, RetrievedFile, SizeResult, Strictness};
use super::probe::LinkProber;

/// Entry point for size resolution and retrieval.
///
/// Holds no per-request state; clones share the same collaborators.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: CatalogResolver,
    prober: Arc<dyn LinkProber>,
}

impl Dispatcher {
    pub fn new(catalog: CatalogResolver, prober: Arc<dyn LinkProber>) -> Self {
        Self { catalog, prober }
    }

    /// Resolve byte size (plus title/duration for catalog videos).
    pub async fn resolve(&self, request: &ResolutionRequest) -> Result<SizeResult, FetchError> {
        self.resolve_with(request, Strictness::Lenient).await
    }

    pub async fn resolve_with(
        &self,
        request: &ResolutionRequest,
        strictness: Strictness,
    ) -> Result<SizeResult, FetchError> {
        request.validate()?;

        let result = match request.resource_class {
            ResourceClass::Catalog => {
                self.catalog
                    .resolve_metadata(&request.url, strictness)
                    .await
            }
            ResourceClass::Direct => self.prober.probe_size(&request.url, strictness).await,
        };

        match &result {
            Ok(size) => info!(
                url = %request.url,
                class = ?request.resource_class,
                size = size.size_bytes,
                "size resolved"
            ),
            Err(e) => log_failure("resolve", request, e),
        }

        result
    }

    /// Materialize the media on disk. Only catalog videos support this.
    pub async fn fetch(&self, request: &ResolutionRequest) -> Result<RetrievedFile, FetchError> {
        request.validate()?;

        let result = match request.resource_class {
            ResourceClass::Catalog => self.catalog.download_media(&request.url).await,
            ResourceClass::Direct => Err(FetchError::UnsupportedOperation),
        };

        if let Err(e) = &result {
            log_failure("fetch", request, e);
        }

        result
    }
}

fn log_failure(operation: &str, request: &ResolutionRequest, err: &FetchError) {
    if err.is_client_error() {
        info!(operation, url = %request.url, kind = %err.kind(), "rejected: {}", err);
    } else {
        error!(operation, url = %request.url, kind = %err.kind(), "failed: {}", err);
    }
}
