//! `/api/auth` handlers and admin bootstrap.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth;
use crate::config::AdminConfig;
use crate::db::{users, Database};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, Role};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Hash on the blocking pool; argon2 is deliberately slow.
pub(crate) async fn hash_blocking(plain: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || auth::hash_password(&plain))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

pub(crate) async fn verify_blocking(plain: String, stored: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || auth::verify_password(&plain, &stored))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let email = auth::normalize_email(&request.email);
    let user = state
        .db
        .call(move |conn| users::find_by_email(conn, &email))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !verify_blocking(request.password, user.password.clone()).await? {
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }
    info!("User {} logged in", user.id);

    Ok(Json(json!({
        "success": true,
        "user_id": user.id,
        "full_name": if user.full_name.is_empty() { "User".to_string() } else { user.full_name },
        "role": user.role,
        "message": "Login successful",
    })))
}

pub async fn register(
    State(state): State<SharedState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<Value>> {
    let email = auth::normalize_email(&request.email);
    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    }

    let lookup = email.clone();
    if state
        .db
        .call(move |conn| users::find_by_email(conn, &lookup))
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let role = request.role.as_deref().map(Role::from).unwrap_or_default();
    if role == Role::Admin && email != auth::normalize_email(&state.config.admin.email) {
        return Err(ApiError::Forbidden(
            "Unauthorized: This email cannot register as Admin.".to_string(),
        ));
    }

    let new_user = NewUser {
        email,
        full_name: request.full_name,
        password_hash: hash_blocking(request.password).await?,
        role,
        bio: "New user".to_string(),
    };

    let user = state
        .db
        .call(move |conn| users::insert(conn, &new_user))
        .await
        .map_err(|e| {
            if e.is_constraint_violation() {
                ApiError::BadRequest("Email already registered".to_string())
            } else {
                ApiError::from(e)
            }
        })?;
    info!("Registered user {} ({})", user.id, user.role);

    Ok(Json(json!({
        "success": true,
        "message": "Registration successful",
        "user_id": user.id,
        "email": user.email,
        "full_name": user.full_name,
        "role": user.role,
    })))
}

/// Create the configured admin, or reset its password and role.
pub async fn seed_admin(db: &Database, admin: &AdminConfig) -> ApiResult<()> {
    let password_hash = hash_blocking(admin.password.clone()).await?;
    let admin = AdminConfig {
        email: auth::normalize_email(&admin.email),
        ..admin.clone()
    };

    let created = db
        .call(move |conn| match users::find_by_email(conn, &admin.email)? {
            Some(existing) => {
                users::set_password(conn, existing.id, &password_hash)?;
                users::set_role(conn, existing.id, Role::Admin)?;
                Ok(false)
            }
            None => {
                users::insert(
                    conn,
                    &NewUser {
                        email: admin.email.clone(),
                        full_name: admin.full_name.clone(),
                        password_hash,
                        role: Role::Admin,
                        bio: "System Administrator".to_string(),
                    },
                )?;
                Ok(true)
            }
        })
        .await?;

    if created {
        info!("Admin user created");
    } else {
        info!("Admin user updated");
    }
    Ok(())
}

/// Seed the admin, logging instead of failing startup.
pub async fn seed_admin_or_warn(db: &Database, admin: &AdminConfig) {
    if let Err(e) = seed_admin(db, admin).await {
        warn!("Skipping admin seeding: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_admin_creates_then_resets() {
        let db = Database::open_in_memory().unwrap();
        let admin = AdminConfig::default();

        seed_admin(&db, &admin).await.unwrap();
        let email = admin.email.clone();
        let user = db
            .call(move |conn| users::find_by_email(conn, &email))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(auth::verify_password(&admin.password, &user.password));

        let id = user.id;
        db.call(move |conn| {
            users::set_role(conn, id, Role::User)?;
            users::set_password(conn, id, "stale")
        })
        .await
        .unwrap();

        seed_admin(&db, &admin).await.unwrap();
        let user = db.call(move |conn| users::get(conn, id)).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(auth::verify_password(&admin.password, &user.password));
        assert_eq!(db.call(|conn| users::count(conn)).await.unwrap(), 1);
    }
}
