use std::sync::Arc;

use axum::{
    Json,
    extract::OriginalUri,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

use crate::bookmarks::BookmarkStore;
use crate::error::ErrorResponse;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookmarkStore>,
}

impl AppState {
    pub fn new(store: impl BookmarkStore) -> Self {
        AppState { store: Arc::new(store) }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(HealthResponse { status: "ok" })
}

// Requests that reach no handler still answer with a JSON message.
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    let body = ErrorResponse::new(format!("No route for {method} {}", uri.path()));
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    let body = ErrorResponse::new(format!("Method {method} not allowed on {}", uri.path()));
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}
