//! `/api/comments` handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{blogs, comments};
use crate::error::{ApiError, ApiResult};
use crate::models::Comment;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(default = "anonymous")]
    pub author: String,
}

fn anonymous() -> String {
    "Anonymous".to_string()
}

pub async fn create_comment(
    State(state): State<SharedState>,
    Path(blog_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Comment cannot be empty".to_string()));
    }

    let comment = state
        .db
        .call(move |conn| {
            if !blogs::exists(conn, blog_id)? {
                return Ok(None);
            }
            comments::insert(conn, blog_id, &request.content, &request.author).map(Some)
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    Ok(Json(comment))
}

pub async fn list_comments(
    State(state): State<SharedState>,
    Path(blog_id): Path<i64>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = state
        .db
        .call(move |conn| comments::list_for_blog(conn, blog_id))
        .await?;
    Ok(Json(comments))
}

pub async fn delete_comment(
    State(state): State<SharedState>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if !state
        .db
        .call(move |conn| comments::delete(conn, comment_id))
        .await?
    {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    Ok(Json(json!({ "success": true, "message": "Comment deleted" })))
}
