//! Notification endpoints, plus the manual alert scan trigger.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use pharma_core::Notification;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::alert_service::{self, ScanOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// `GET /api/notifications`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    Ok(Json(state.db.notifications().list(limit).await?))
}

/// `PUT /api/notifications/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.notifications().mark_read(id).await?;
    Ok(Json(json!({ "read": id })))
}

/// `PUT /api/notifications/read-all`
pub async fn mark_all_read(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = state.db.notifications().mark_all_read().await?;
    Ok(Json(json!({ "updated": updated })))
}

/// `DELETE /api/notifications/{id}`
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.notifications().delete(id).await?;
    Ok(Json(json!({ "deleted": id })))
}

/// `POST /api/alerts/scan`
///
/// Runs the inventory alert scan on demand instead of waiting for the
/// daily tick. Admin only.
pub async fn trigger_scan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ScanOutcome>, ApiError> {
    auth.require_admin()?;

    let outcome = alert_service::scan(&state.db, state.config.expiry_warning_days).await?;
    Ok(Json(outcome))
}
