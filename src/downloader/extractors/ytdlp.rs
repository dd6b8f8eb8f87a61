// yt-dlp extractor - drives yt-dlp as a subprocess
//
// Two ways to launch it:
// - Python module (`python3 -m yt_dlp`), preferred when importable
// - Native `yt-dlp` binary
//
// Detection runs once at construction; YTDLP_PYTHON / YTDLP_PATH override it.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use super::traits::{DownloadedMedia, ExtractorConfig, MediaExtractor};
use crate::downloader::errors::{summarize_tool_stderr, FetchError};
use crate::downloader::models::ExtractedMetadata;
use crate::downloader::utils::{find_executable, probe_command, run_output_with_timeout, RunError};

/// How yt-dlp gets started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// `<python> -m yt_dlp`
    PythonModule(String),
    /// Native binary
    Binary(String),
}

impl Launcher {
    pub fn program(&self) -> &str {
        match self {
            Self::PythonModule(python) => python,
            Self::Binary(path) => path,
        }
    }

    fn prefix_args(&self) -> Vec<String> {
        match self {
            Self::PythonModule(_) => vec!["-m".to_string(), "yt_dlp".to_string()],
            Self::Binary(_) => Vec::new(),
        }
    }

    /// Find a working launcher, honouring explicit configuration first.
    pub fn detect(config: &ExtractorConfig) -> Option<Self> {
        if let Some(path) = &config.ytdlp_path {
            return Some(Self::Binary(path.clone()));
        }
        if let Some(python) = &config.python {
            return Some(Self::PythonModule(python.clone()));
        }

        for python in ["python3", "python"] {
            if probe_command(python, &["-c", "import yt_dlp"]) {
                return Some(Self::PythonModule(python.to_string()));
            }
        }

        find_executable("yt-dlp")
            .filter(|path| probe_command(path, &["--version"]))
            .map(Self::Binary)
    }
}

/// Extractor backed by yt-dlp
pub struct YtDlpExtractor {
    launcher: Option<Launcher>,
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let launcher = Launcher::detect(&config);
        if let Some(l) = &launcher {
            info!(launcher = ?l, "yt-dlp located");
        }
        Self { launcher, config }
    }

    pub fn with_launcher(launcher: Launcher, config: ExtractorConfig) -> Self {
        Self {
            launcher: Some(launcher),
            config,
        }
    }

    fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "-f".to_string(),
            "best".to_string(),
        ];

        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }

    fn metadata_args(&self, url: &str) -> Vec<String> {
        let mut args = self.common_args();
        args.extend([
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
        ]);
        args.push(url.to_string());
        args
    }

    fn download_args(&self, url: &str, output_template: &str) -> Vec<String> {
        let mut args = self.common_args();
        args.extend([
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            output_template.to_string(),
            "--no-simulate".to_string(),
            "--dump-single-json".to_string(),
            "--no-progress".to_string(),
        ]);
        args.push(url.to_string());
        args
    }

    /// Run yt-dlp and return its parsed JSON, or the message of a failure.
    async fn run_json(&self, args: Vec<String>) -> Result<serde_json::Value, String> {
        let launcher = self
            .launcher
            .as_ref()
            .ok_or_else(|| "yt-dlp not available: install yt-dlp or set YTDLP_PATH".to_string())?;

        let mut full_args = launcher.prefix_args();
        full_args.extend(args);

        let output = run_output_with_timeout(launcher.program(), &full_args, self.config.timeout)
            .await
            .map_err(|e| match e {
                RunError::Launch(msg) => format!("yt-dlp not available: {}", msg),
                other => other.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(status = ?output.status, stderr = %stderr, "yt-dlp failed");
            return Err(summarize_tool_stderr(&stderr));
        }

        parse_json_output(&output.stdout)
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        match self.launcher {
            Some(Launcher::PythonModule(_)) => "python-yt-dlp",
            _ => "cli-yt-dlp",
        }
    }

    fn is_available(&self) -> bool {
        self.launcher.is_some()
    }

    async fn extract_metadata(&self, url: &str) -> Result<ExtractedMetadata, FetchError> {
        let json = self
            .run_json(self.metadata_args(url))
            .await
            .map_err(FetchError::ExtractionFailed)?;
        Ok(ExtractedMetadata::from_json(&json))
    }

    async fn download(
        &self,
        url: &str,
        output_template: &str,
    ) -> Result<DownloadedMedia, FetchError> {
        let json = self
            .run_json(self.download_args(url, output_template))
            .await
            .map_err(FetchError::DownloadFailed)?;

        let path = downloaded_path(&json).ok_or_else(|| {
            FetchError::DownloadFailed("yt-dlp did not report an output file".to_string())
        })?;

        Ok(DownloadedMedia {
            path,
            metadata: ExtractedMetadata::from_json(&json),
        })
    }
}

/// Parse the single JSON document yt-dlp prints, tolerating stray lines.
fn parse_json_output(stdout: &[u8]) -> Result<serde_json::Value, String> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    trimmed
        .lines()
        .rev()
        .find_map(|line| serde_json::from_str::<serde_json::Value>(line.trim()).ok())
        .ok_or_else(|| "Invalid JSON from yt-dlp".to_string())
}

/// Where the tool put the merged file, most specific field first.
fn downloaded_path(json: &serde_json::Value) -> Option<PathBuf> {
    let candidates = [
        json["requested_downloads"][0]["filepath"].as_str(),
        json["filepath"].as_str(),
        json["_filename"].as_str(),
        json["filename"].as_str(),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|p| !p.is_empty())
        .map(PathBuf::from)
}
