//! Bookmarks Module
//!
//! Title + URL records with creation and update timestamps, exposed as a small
//! REST resource under `/api/bookmarks`.
//!
//! # Layout
//!
//! - `model`: the `Bookmark` entity, its `BookmarkInfo` projection and payload validation
//! - `store`: the `BookmarkStore` trait and its libsql implementation
//! - `memory`: an in-process `BookmarkStore` for ephemeral runs
//! - `handler` / `routes`: the HTTP surface
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmarks::bookmarks;
//!
//! let app = Router::new()
//!     .nest(bookmarks::BASE_PATH, bookmarks::routes())
//!     .with_state(app_state);
//! ```

mod handler;
mod memory;
mod model;
mod routes;
mod store;

pub use memory::MemoryBookmarkStore;
pub use model::*;
pub use routes::routes;
pub use store::{BookmarkStore, LibsqlBookmarkStore};

pub const BASE_PATH: &str = "/api/bookmarks";
