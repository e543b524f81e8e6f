//! HTTP Handlers for the Bookmarks API

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::model::timestamp_now;
use super::{BASE_PATH, Bookmark, BookmarkInfo, BookmarkPayload, NewBookmark};
use crate::error::ApiError;
use crate::handler::AppState;

fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn body(payload: Result<Json<BookmarkPayload>, JsonRejection>) -> Result<BookmarkPayload, ApiError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn location(id: i64) -> String {
    format!("{BASE_PATH}/{id}")
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = state.store.list_all().await?;
    tracing::debug!(count = bookmarks.len(), "listed bookmarks");
    Ok(Json(bookmarks))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BookmarkInfo>, ApiError> {
    let id = path_id(id)?;

    match state.store.find_info_by_id(id).await? {
        Some(info) => Ok(Json(info)),
        None => Err(ApiError::NotFound(id)),
    }
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: Result<Json<BookmarkPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let valid = body(payload)?.validate()?;

    // The caller never controls the creation time.
    let bookmark = state
        .store
        .insert(NewBookmark::new(valid, timestamp_now()))
        .await?;
    tracing::info!(id = bookmark.id, "created bookmark");

    Ok((StatusCode::CREATED, [(header::LOCATION, location(bookmark.id))]).into_response())
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookmarkPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    let valid = body(payload)?.validate()?;

    let existing = state.store.find_by_id(id).await?.ok_or(ApiError::NotFound(id))?;
    let revised = existing.revise(valid, timestamp_now());

    // The row can disappear between the lookup and the write.
    state.store.save(&revised).await?.ok_or(ApiError::NotFound(id))?;
    tracing::info!(id, "updated bookmark");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;

    let existing = state.store.find_by_id(id).await?.ok_or(ApiError::NotFound(id))?;
    if !state.store.delete(&existing).await? {
        return Err(ApiError::NotFound(id));
    }
    tracing::info!(id, "deleted bookmark");

    Ok(StatusCode::OK)
}
