//! Direct-link size probing.
//!
//! HEAD first; when the server leaves out `Content-Length`, a GET is started
//! and only its headers are read before the response is dropped. Both stages
//! share one timeout and follow redirects.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::redirect::Policy;
use tracing::{debug, warn};

use super::errors::FetchError;
use super::models::{SizeResult, Strictness};

/// Desktop browser UA; some hosts reject or mangle probes without one.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_REDIRECTS: usize = 10;

/// Something that can learn the byte size behind a URL
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn probe_size(&self, url: &str, strictness: Strictness)
        -> Result<SizeResult, FetchError>;
}

/// reqwest-backed two-stage prober
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration, proxy: Option<&str>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(BROWSER_USER_AGENT);

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| FetchError::Internal(format!("Invalid proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn head_length(&self, url: &str) -> Result<Option<u64>, FetchError> {
        let response = self.client.head(url).send().await?;
        debug!(url, status = %response.status(), "HEAD probe");
        Ok(content_length(response.headers()))
    }

    async fn get_length(&self, url: &str) -> Result<Option<u64>, FetchError> {
        // Headers only; dropping the response abandons the body.
        let response = self.client.get(url).send().await?;
        debug!(url, status = %response.status(), "GET probe");
        Ok(content_length(response.headers()))
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe_size(
        &self,
        url: &str,
        strictness: Strictness,
    ) -> Result<SizeResult, FetchError> {
        if let Some(size) = self.head_length(url).await? {
            return Ok(SizeResult::bytes(size));
        }

        debug!(url, "no Content-Length on HEAD, falling back to GET");

        match self.get_length(url).await? {
            Some(size) => Ok(SizeResult::bytes(size)),
            None if strictness == Strictness::Strict => Err(FetchError::ProbeFailed(
                "Server did not report Content-Length".to_string(),
            )),
            None => {
                warn!(url, "size unknown after HEAD and GET");
                Ok(SizeResult::bytes(0))
            }
        }
    }
}

/// `Content-Length` as an integer. Unparseable values count as absent.
pub fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
