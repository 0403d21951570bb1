//! `/api/user` handlers: profiles, avatars and password changes.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::auth::{hash_blocking, verify_blocking};
use crate::db::{blogs, users};
use crate::error::{ApiError, ApiResult};
use crate::models::ProfileChanges;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

const AVATAR_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Extension for a stored avatar, taken from the upload name.
///
/// Only image types are kept; anything else is stored as `jpg` so the
/// static file server never hands back markup or scripts.
fn avatar_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| AVATAR_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| "jpg".to_string())
}

pub async fn get_profile(State(state): State<SharedState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let (user, blog_count) = state
        .db
        .call(move |conn| {
            let Some(user) = users::get(conn, id)? else {
                return Ok(None);
            };
            let count = blogs::count_by_author(conn, user.id, &user.full_name)?;
            Ok(Some((user, count)))
        })
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(json!({
        "id": user.id,
        "email": user.email,
        "full_name": if user.full_name.is_empty() { "User".to_string() } else { user.full_name },
        "role": user.role,
        "bio": user.bio,
        "avatar_url": user.avatar_url,
        "social_links": user.social_links,
        "created_at": user.created_at,
        "blog_count": blog_count,
    })))
}

pub async fn update_profile(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(changes): Json<ProfileChanges>,
) -> ApiResult<Json<Value>> {
    let user = state
        .db
        .call(move |conn| users::update_profile(conn, id, &changes))
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "user": {
            "id": user.id,
            "full_name": user.full_name,
            "email": user.email,
            "bio": user.bio,
            "avatar_url": user.avatar_url,
            "social_links": user.social_links,
        }
    })))
}

pub async fn upload_avatar(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    if state.db.call(move |conn| users::get(conn, id)).await?.is_none() {
        return Err(user_not_found());
    }

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let extension = avatar_extension(field.file_name());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;
        upload = Some((extension, bytes));
        break;
    }

    let (extension, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing file field".to_string()))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let uploads = &state.config.uploads;
    let dir = uploads.avatar_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to upload avatar: {}", e)))?;

    let file_name = format!("avatar_{}_{}.{}", id, Utc::now().timestamp(), extension);
    let path = dir.join(&file_name);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to upload avatar: {}", e)))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());

    let avatar_url = uploads.avatar_url(&file_name);
    let stored_url = avatar_url.clone();
    state
        .db
        .call(move |conn| users::set_avatar(conn, id, &stored_url))
        .await?;
    info!("Updated avatar for user {}", id);

    Ok(Json(json!({ "success": true, "avatar_url": avatar_url })))
}

pub async fn change_password(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(request): Json<PasswordChangeRequest>,
) -> ApiResult<Json<Value>> {
    let user = state
        .db
        .call(move |conn| users::get(conn, id))
        .await?
        .ok_or_else(user_not_found)?;

    if !verify_blocking(request.current_password, user.password).await? {
        return Err(ApiError::BadRequest("Incorrect current password".to_string()));
    }
    if request.new_password.is_empty() {
        return Err(ApiError::BadRequest("New password must not be empty".to_string()));
    }

    let hash = hash_blocking(request.new_password).await?;
    state
        .db
        .call(move |conn| users::set_password(conn, id, &hash))
        .await?;
    info!("Password changed for user {}", id);

    Ok(Json(json!({ "success": true, "message": "Password updated successfully" })))
}
