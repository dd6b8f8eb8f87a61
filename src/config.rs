//! Process configuration read from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::downloader::probe::DEFAULT_PROBE_TIMEOUT;
use crate::downloader::ExtractorConfig;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloaded_videos";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub download_dir: PathBuf,
    pub probe_timeout: Duration,
    pub extract_timeout: Option<Duration>,
    pub ytdlp_path: Option<String>,
    pub ytdlp_python: Option<String>,
    pub proxy: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            extract_timeout: None,
            ytdlp_path: None,
            ytdlp_python: None,
            proxy: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => parse(&raw, "PORT", "a port number")?,
            None => defaults.port,
        };
        let host = match get("HOST") {
            Some(raw) => parse(&raw, "HOST", "an IP address")?,
            None => defaults.host,
        };
        let probe_timeout = match get("PROBE_TIMEOUT_SECS") {
            Some(raw) => secs(&raw, "PROBE_TIMEOUT_SECS")?,
            None => defaults.probe_timeout,
        };
        let extract_timeout = get("EXTRACT_TIMEOUT_SECS")
            .map(|raw| secs(&raw, "EXTRACT_TIMEOUT_SECS"))
            .transpose()?;

        Ok(Self {
            host,
            port,
            download_dir: get("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            probe_timeout,
            extract_timeout,
            ytdlp_path: get("YTDLP_PATH"),
            ytdlp_python: get("YTDLP_PYTHON"),
            proxy: get("MEDIA_PROXY"),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::default()
            .with_proxy(self.proxy.clone())
            .with_timeout(self.extract_timeout)
            .with_ytdlp_path(self.ytdlp_path.clone())
            .with_python(self.ytdlp_python.clone())
    }
}

fn parse<T: std::str::FromStr>(
    raw: &str,
    name: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value: raw.to_string(),
    })
}

fn secs(raw: &str, name: &'static str) -> Result<Duration, ConfigError> {
    let value: u64 = parse(raw, name, "a positive number of seconds")?;
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            expected: "a positive number of seconds",
            value: raw.to_string(),
        });
    }
    Ok(Duration::from_secs(value))
}
