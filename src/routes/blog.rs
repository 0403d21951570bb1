//! `/api/blog` handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::db::{blogs, usage, users};
use crate::error::{ApiError, ApiResult};
use crate::models::{BlogChanges, NewBlog};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

fn blog_not_found() -> ApiError {
    ApiError::NotFound("Blog not found".to_string())
}

pub async fn list_blogs(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Value>> {
    let search = query.search.filter(|s| !s.is_empty());
    let blogs = state
        .db
        .call(move |conn| blogs::list(conn, search.as_deref()))
        .await?;

    Ok(Json(json!({
        "success": true,
        "total": blogs.len(),
        "blogs": blogs,
    })))
}

pub async fn get_blog(State(state): State<SharedState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let blog = state
        .db
        .call(move |conn| blogs::get(conn, id))
        .await?
        .ok_or_else(blog_not_found)?;

    Ok(Json(json!({ "success": true, "blog": blog })))
}

pub async fn list_user_blogs(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let blogs = state
        .db
        .call(move |conn| blogs::list_by_user(conn, user_id))
        .await?;

    Ok(Json(json!({
        "success": true,
        "total": blogs.len(),
        "blogs": blogs,
    })))
}

pub async fn create_blog(
    State(state): State<SharedState>,
    Json(request): Json<CreateBlogRequest>,
) -> ApiResult<Json<Value>> {
    let new_blog = NewBlog {
        title: request.title,
        content: request.content,
        author: request
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| "Anonymous".to_string()),
        user_id: request.user_id,
        tags: request.tags.unwrap_or_default(),
    };

    let blog = state.db.call(move |conn| blogs::insert(conn, &new_blog)).await?;
    info!("Created blog {} by {}", blog.id, blog.author);

    Ok(Json(json!({
        "success": true,
        "message": "Blog created successfully",
        "blog": blog,
    })))
}

pub async fn update_blog(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(changes): Json<BlogChanges>,
) -> ApiResult<Json<Value>> {
    let blog = state
        .db
        .call(move |conn| blogs::update(conn, id, &changes))
        .await?
        .ok_or_else(blog_not_found)?;

    Ok(Json(json!({
        "success": true,
        "message": "Blog updated successfully",
        "blog": blog,
    })))
}

pub async fn delete_blog(State(state): State<SharedState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    if !state.db.call(move |conn| blogs::delete(conn, id)).await? {
        return Err(blog_not_found());
    }
    info!("Deleted blog {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Blog deleted successfully",
    })))
}

/// Headline counters for the writer dashboard.
pub async fn stats_overview(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    let (total_blogs, total_users, ai_usage_count) = state
        .db
        .call(|conn| Ok((blogs::count(conn)?, users::count(conn)?, usage::count(conn)?)))
        .await?;

    Ok(Json(json!({
        "success": true,
        "stats": {
            "total_blogs": total_blogs,
            "total_users": total_users,
            "ai_usage_count": ai_usage_count,
        }
    })))
}
