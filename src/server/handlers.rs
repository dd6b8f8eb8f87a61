//! Request handlers. Each one parses the body, hands a `ResolutionRequest` to
//! the dispatcher, and turns the outcome into a response.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::Response;
use axum::Json;

use super::interfaces::{FileSizeResponse, HealthResponse, MediaRequest, StatusResponse};
use super::AppState;
use crate::downloader::{stream_file, FetchError, ResolutionRequest, Strictness};

pub const API_VERSION: &str = "1.0";

pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
    })
}

pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: API_VERSION,
    })
}

/// Download a catalog video and stream it back as an attachment.
pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> Result<Response<Body>, FetchError> {
    let Json(body) = payload?;
    let request = ResolutionRequest::from_parts(body.url.clone(), body.is_catalog())?;

    let file = state.dispatcher.fetch(&request).await?;
    stream_file(&file).await
}

/// Report the byte size of a catalog video or direct link.
pub async fn get_file_size(
    State(state): State<AppState>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> Result<Json<FileSizeResponse>, FetchError> {
    let Json(body) = payload?;
    let request = ResolutionRequest::from_parts(body.url.clone(), body.is_catalog())?;
    let strictness = if body.strict {
        Strictness::Strict
    } else {
        Strictness::Lenient
    };

    let result = state.dispatcher.resolve_with(&request, strictness).await?;
    Ok(Json(FileSizeResponse::from_result(
        result,
        request.resource_class,
    )))
}
