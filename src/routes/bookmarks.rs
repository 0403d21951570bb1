//! `/api/bookmarks` handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{blogs, bookmarks};
use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct BookmarkRequest {
    pub user_id: i64,
    pub blog_id: i64,
}

pub async fn toggle_bookmark(
    State(state): State<SharedState>,
    Json(request): Json<BookmarkRequest>,
) -> ApiResult<Json<Value>> {
    let BookmarkRequest { user_id, blog_id } = request;

    let bookmarked = state
        .db
        .call(move |conn| {
            if !blogs::exists(conn, blog_id)? {
                return Ok(None);
            }
            bookmarks::toggle(conn, user_id, blog_id).map(Some)
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    let message = if bookmarked { "Bookmark added" } else { "Bookmark removed" };
    Ok(Json(json!({
        "success": true,
        "bookmarked": bookmarked,
        "message": message,
    })))
}

pub async fn list_bookmarks(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let blogs = state
        .db
        .call(move |conn| bookmarks::list_blogs(conn, user_id))
        .await?;

    Ok(Json(json!({ "success": true, "bookmarks": blogs })))
}

pub async fn bookmark_status(
    State(state): State<SharedState>,
    Path((user_id, blog_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Value>> {
    let bookmarked = state
        .db
        .call(move |conn| bookmarks::is_bookmarked(conn, user_id, blog_id))
        .await?;

    Ok(Json(json!({ "success": true, "bookmarked": bookmarked })))
}
