use axum::{Router, routing::get};

use super::handler;
use crate::handler::{AppState, method_not_allowed};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handler::list_bookmarks)
                .post(handler::create_bookmark)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(handler::get_bookmark)
                .put(handler::update_bookmark)
                .delete(handler::delete_bookmark)
                .fallback(method_not_allowed),
        )
}
