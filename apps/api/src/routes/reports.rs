//! Reporting endpoints.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use pharma_db::repository::report::{DashboardStats, MonthlyReport};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// `GET /api/reports/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.db.reports().dashboard().await?))
}

/// `GET /api/reports/monthly?year=2026&month=8`
///
/// Defaults to the current month when parameters are omitted.
pub async fn monthly(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyReport>, ApiError> {
    let report = match (query.year, query.month) {
        (Some(year), Some(month)) => {
            if !(1..=12).contains(&month) {
                return Err(ApiError::Validation(
                    "month must be between 1 and 12".to_string(),
                ));
            }
            state.db.reports().monthly(year, month).await?
        }
        (None, None) => state.db.reports().current_month().await?,
        _ => {
            return Err(ApiError::Validation(
                "year and month must be provided together".to_string(),
            ))
        }
    };

    Ok(Json(report))
}
