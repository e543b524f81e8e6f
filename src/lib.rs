use axum::{Router, http::Method, routing::get};
use std::error::Error;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handler::{AppState, healthcheck, route_not_found};

pub mod bookmarks;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;

/// Full HTTP surface of the service, ready to serve.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(healthcheck))
        .nest(bookmarks::BASE_PATH, bookmarks::routes())
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn unpack_error(err: &dyn Error) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_error_walks_the_source_chain() {
        let err = anyhow::anyhow!("disk full").context("insert failed");
        assert_eq!(unpack_error(&*err), "insert failed: disk full");
    }
}
