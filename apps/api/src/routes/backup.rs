//! Backup endpoint. Admin only.

use axum::extract::State;
use axum::Json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::backup_service::{self, BackupSummary};
use crate::state::AppState;

/// `POST /api/backup`
pub async fn run(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<BackupSummary>, ApiError> {
    auth.require_admin()?;

    let summary = backup_service::run(&state.db, &state.config.backup_dir).await?;
    Ok(Json(summary))
}
