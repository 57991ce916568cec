//! Login and current-user endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use pharma_core::{NewActivityEntry, User};

use crate::auth::{verify_password, AuthUser};
use crate::error::ApiError;
use crate::services::audit;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address; the lookup accepts either.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// `POST /api/auth/login`
///
/// The response to a wrong username and a wrong password is identical,
/// so the endpoint does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = state
        .db
        .users()
        .get_by_username_or_email(req.username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    if !user.is_active() {
        return Err(ApiError::Forbidden("Account is inactive".to_string()));
    }

    state.db.users().touch_last_login(user.id).await?;

    let token = state.jwt.generate_token(user.id, &user.username, user.role)?;

    info!(user_id = user.id, username = %user.username, "User logged in");

    audit::record_activity(
        &state.db,
        NewActivityEntry {
            user_id: user.id,
            action: "LOGIN".to_string(),
            ..Default::default()
        },
    )
    .await;

    Ok(Json(LoginResponse { token, user }))
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
