//! `/api/settings` handlers.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::db::settings;
use crate::error::ApiResult;
use crate::models::SiteSettings;
use crate::state::SharedState;

pub async fn get_settings(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    let settings = state.db.call(|conn| settings::get_or_create(conn)).await?;
    Ok(Json(json!({ "success": true, "settings": settings })))
}

pub async fn update_settings(
    State(state): State<SharedState>,
    Json(update): Json<SiteSettings>,
) -> ApiResult<Json<Value>> {
    let site_name = update.site_name.clone();
    state.db.call(move |conn| settings::update(conn, &update)).await?;
    info!("Site settings updated ({})", site_name);

    Ok(Json(json!({ "success": true, "message": "Settings updated successfully" })))
}
