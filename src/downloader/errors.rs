// Error types for resolution and retrieval

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the dispatcher can surface. The message of each variant is
/// what callers see; `kind()` is what code should branch on.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Missing or empty URL, or a body that could not be parsed
    #[error("{0}")]
    InvalidRequest(String),

    /// Resource class / operation combination that is not implemented
    #[error("Unsupported URL type")]
    UnsupportedOperation,

    /// Network-level failure while probing a direct link
    #[error("{0}")]
    ProbeFailed(String),

    /// The extraction tool could not resolve metadata for a catalog URL
    #[error("{0}")]
    ExtractionFailed(String),

    /// The extraction tool could not materialize the media file
    #[error("{0}")]
    DownloadFailed(String),

    /// Materialized file vanished before it could be streamed
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Anything else
    #[error("{0}")]
    Internal(String),
}

/// Kind of a [`FetchError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    UnsupportedOperation,
    ProbeFailed,
    ExtractionFailed,
    DownloadFailed,
    FileNotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnsupportedOperation => "unsupported_operation",
            Self::ProbeFailed => "probe_failed",
            Self::ExtractionFailed => "extraction_failed",
            Self::DownloadFailed => "download_failed",
            Self::FileNotFound => "file_not_found",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchError {
    pub fn missing_url() -> Self {
        Self::InvalidRequest("URL is required".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::UnsupportedOperation => ErrorKind::UnsupportedOperation,
            Self::ProbeFailed(_) => ErrorKind::ProbeFailed,
            Self::ExtractionFailed(_) => ErrorKind::ExtractionFailed,
            Self::DownloadFailed(_) => ErrorKind::DownloadFailed,
            Self::FileNotFound(_) => ErrorKind::FileNotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the caller, rather than the service or upstream, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidRequest | ErrorKind::UnsupportedOperation
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else {
            err.to_string()
        };
        Self::ProbeFailed(message)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Pull the most useful line out of yt-dlp stderr.
///
/// yt-dlp prefixes the fatal message with `ERROR:`; warnings and progress
/// noise are dropped. Falls back to the last non-empty line.
pub fn summarize_tool_stderr(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(line) = lines.iter().rev().find(|l| l.starts_with("ERROR:")) {
        return line.trim_start_matches("ERROR:").trim().to_string();
    }

    lines
        .last()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp exited without output".to_string())
}
