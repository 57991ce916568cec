//! Category endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use pharma_core::validation::validate_name;
use pharma_core::{Category, NewCategory};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::audit;
use crate::state::AppState;

/// `GET /api/categories`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.db.categories().list().await?))
}

/// `GET /api/categories/{id}`
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {id}")))?;

    Ok(Json(category))
}

/// `POST /api/categories`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    validate_name(&req.name)?;

    let category = state.db.categories().create(&req).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(
            auth.user_id,
            "CREATE_CATEGORY",
            "categories",
            category.id,
            Some(json!({ "name": category.name }).to_string()),
        ),
    )
    .await;

    Ok(Json(category))
}

/// `PUT /api/categories/{id}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    validate_name(&req.name)?;

    let category = state.db.categories().update(id, &req).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(auth.user_id, "UPDATE_CATEGORY", "categories", id, None),
    )
    .await;

    Ok(Json(category))
}

/// `DELETE /api/categories/{id}`
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.categories().delete(id).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(auth.user_id, "DELETE_CATEGORY", "categories", id, None),
    )
    .await;

    Ok(Json(json!({ "deleted": id })))
}
