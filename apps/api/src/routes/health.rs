//! Health check endpoint. Unauthenticated.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// `GET /api/health`
pub async fn check(State(state): State<AppState>) -> Json<Value> {
    let db_ok = state.db.health_check().await;

    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
    }))
}
