//! Streams a retrieved file back to the caller as an attachment.

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use super::errors::FetchError;
use super::models::RetrievedFile;

/// Build a streaming response for `file`.
///
/// # Errors
///
/// `FileNotFound` if the file disappeared after it was resolved; `Internal`
/// for any other I/O or response-building failure.
pub async fn stream_file(file: &RetrievedFile) -> Result<Response<Body>, FetchError> {
    let handle = match File::open(&file.local_path).await {
        Ok(handle) => handle,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %file.local_path.display(), "file vanished before streaming");
            return Err(FetchError::FileNotFound(file.local_path.clone()));
        }
        Err(e) => {
            return Err(FetchError::Internal(format!(
                "Failed to open {}: {}",
                file.local_path.display(),
                e
            )))
        }
    };

    let length = handle.metadata().await?.len();
    debug!(path = %file.local_path.display(), length, "streaming file");

    let content_type = HeaderValue::from_str(&file.mime_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(&file.display_name))
        .unwrap_or(HeaderValue::from_static("attachment"));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, length)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(ReaderStream::new(handle)))
        .map_err(|e| FetchError::Internal(format!("Failed to build response: {}", e)))
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    if ascii == filename {
        format!("attachment; filename=\"{}\"", ascii)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            ascii,
            urlencoding::encode(filename)
        )
    }
}
