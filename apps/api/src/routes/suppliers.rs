//! Supplier endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use pharma_core::validation::validate_name;
use pharma_core::{NewSupplier, Supplier};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::audit;
use crate::state::AppState;

/// `GET /api/suppliers`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    Ok(Json(state.db.suppliers().list().await?))
}

/// `GET /api/suppliers/{id}`
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Supplier>, ApiError> {
    let supplier = state
        .db
        .suppliers()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Supplier not found: {id}")))?;

    Ok(Json(supplier))
}

/// `POST /api/suppliers`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewSupplier>,
) -> Result<Json<Supplier>, ApiError> {
    validate_name(&req.name)?;

    let supplier = state.db.suppliers().create(&req).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(
            auth.user_id,
            "CREATE_SUPPLIER",
            "suppliers",
            supplier.id,
            Some(json!({ "name": supplier.name }).to_string()),
        ),
    )
    .await;

    Ok(Json(supplier))
}

/// `PUT /api/suppliers/{id}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<NewSupplier>,
) -> Result<Json<Supplier>, ApiError> {
    validate_name(&req.name)?;

    let supplier = state.db.suppliers().update(id, &req).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(auth.user_id, "UPDATE_SUPPLIER", "suppliers", id, None),
    )
    .await;

    Ok(Json(supplier))
}

/// `DELETE /api/suppliers/{id}`
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.suppliers().delete(id).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(auth.user_id, "DELETE_SUPPLIER", "suppliers", id, None),
    )
    .await;

    Ok(Json(json!({ "deleted": id })))
}
