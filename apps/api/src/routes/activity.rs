//! Activity log endpoints. Admin only.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use pharma_core::ActivityLogView;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    /// Filter to one action type, e.g. `CREATE_SALE`.
    pub action: Option<String>,
}

/// `GET /api/activity`
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ActivityLogView>>, ApiError> {
    auth.require_admin()?;

    let limit = query.limit.unwrap_or(100).clamp(1, 1000);

    let entries = match query.action {
        Some(action) => state.db.activity().list_by_action(&action, limit).await?,
        None => state.db.activity().list(limit).await?,
    };

    Ok(Json(entries))
}
