//! User management endpoints. Admin only.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use pharma_core::validation::{validate_name, validate_username};
use pharma_core::{AccountStatus, NewUser, User, UserRole};

use crate::auth::{hash_password, AuthUser};
use crate::error::ApiError;
use crate::services::audit;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: AccountStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
    /// When present, resets the password.
    pub password: Option<String>,
}

/// `GET /api/users`
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    auth.require_admin()?;
    Ok(Json(state.db.users().list().await?))
}

/// `GET /api/users/{id}`
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    auth.require_admin()?;

    let user = state
        .db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {id}")))?;

    Ok(Json(user))
}

/// `POST /api/users`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    auth.require_admin()?;
    validate_name(&req.name)?;
    validate_username(&req.username)?;

    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;

    let user = state
        .db
        .users()
        .create(&NewUser {
            name: req.name,
            username: req.username,
            email: req.email,
            password_hash,
            phone: req.phone,
            role: req.role,
            status: req.status,
        })
        .await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(
            auth.user_id,
            "CREATE_USER",
            "users",
            user.id,
            Some(json!({ "username": user.username, "role": user.role }).to_string()),
        ),
    )
    .await;

    Ok(Json(user))
}

/// `PUT /api/users/{id}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    auth.require_admin()?;
    validate_name(&req.name)?;

    if let Some(password) = &req.password {
        if password.len() < 8 {
            return Err(ApiError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
    }

    let user = state
        .db
        .users()
        .update(
            id,
            &req.name,
            req.email.as_deref(),
            req.phone.as_deref(),
            req.role,
            req.status,
        )
        .await?;

    if let Some(password) = &req.password {
        let hash = hash_password(password)?;
        state.db.users().update_password(id, &hash).await?;
    }

    audit::record_activity(
        &state.db,
        audit::create_entry(auth.user_id, "UPDATE_USER", "users", id, None),
    )
    .await;

    Ok(Json(user))
}

/// `DELETE /api/users/{id}`
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;

    if id == auth.user_id {
        return Err(ApiError::Validation(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.db.users().delete(id).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(auth.user_id, "DELETE_USER", "users", id, None),
    )
    .await;

    Ok(Json(json!({ "deleted": id })))
}
