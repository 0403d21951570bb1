//! `/api/admin` handlers.

use axum::{extract::State, Json};
use chrono::Local;
use serde_json::{json, Value};

use crate::analytics::{window_start, Dashboard, DashboardStats};
use crate::db::{blogs, usage, users};
use crate::error::ApiResult;
use crate::state::SharedState;

/// Counters, the weekly AI usage series and the top tags.
pub async fn stats(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    let today = Local::now().date_naive();
    // Date prefix only, so space-separated legacy timestamps still compare in range.
    let since = window_start(today).date().format("%Y-%m-%d").to_string();

    let (stats, timestamps, tag_rows) = state
        .db
        .call(move |conn| {
            let stats = DashboardStats {
                total_blogs: blogs::count(conn)?,
                total_users: users::count(conn)?,
                ai_requests: usage::count(conn)?,
            };
            Ok((stats, usage::timestamps_since(conn, &since)?, blogs::raw_tags(conn)?))
        })
        .await?;

    let dashboard = Dashboard::build(stats, timestamps, tag_rows, today);

    Ok(Json(json!({
        "success": true,
        "stats": dashboard.stats,
        "chart_data": dashboard.chart_data,
        "category_data": dashboard.category_data,
    })))
}

pub async fn list_users(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    let users = state.db.call(|conn| users::list(conn)).await?;

    let users: Vec<Value> = users
        .into_iter()
        .map(|user| {
            json!({
                "id": user.id,
                "email": user.email,
                "full_name": if user.full_name.is_empty() { "Unknown".to_string() } else { user.full_name },
                "role": user.role,
                "bio": user.bio,
                "created_at": user.created_at,
            })
        })
        .collect();

    Ok(Json(json!({ "success": true, "users": users })))
}
