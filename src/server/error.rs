use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::downloader::{ErrorKind, FetchError};

impl FetchError {
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidRequest | ErrorKind::UnsupportedOperation => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind().as_str(),
        }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for FetchError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
