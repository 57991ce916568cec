//! Product catalog endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use pharma_core::validation::{validate_name, validate_price_cents};
use pharma_core::{NewProduct, Product, ProductSummary};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::audit;
use crate::state::AppState;

fn validate_product(req: &NewProduct) -> Result<(), ApiError> {
    validate_name(&req.name)?;
    validate_price_cents(req.price_cents)?;
    validate_price_cents(req.purchase_price_cents)?;
    if req.min_stock < 0 {
        return Err(ApiError::Validation(
            "min_stock must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// `GET /api/products`
///
/// Includes category and supplier names for the inventory screen.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    Ok(Json(state.db.products().list().await?))
}

/// `GET /api/products/{id}`
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;

    Ok(Json(product))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    validate_product(&req)?;

    let product = state.db.products().create(&req).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(
            auth.user_id,
            "CREATE_PRODUCT",
            "products",
            product.id,
            Some(
                json!({
                    "name": product.name,
                    "price_cents": product.price_cents,
                    "stock": product.stock,
                })
                .to_string(),
            ),
        ),
    )
    .await;

    Ok(Json(product))
}

/// `PUT /api/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    validate_product(&req)?;

    let before = state.db.products().get_by_id(id).await?;
    let product = state.db.products().update(id, &req).await?;

    audit::record_activity(
        &state.db,
        pharma_core::NewActivityEntry {
            user_id: auth.user_id,
            action: "UPDATE_PRODUCT".to_string(),
            table_name: Some("products".to_string()),
            record_id: Some(id),
            old_values: before
                .as_ref()
                .and_then(|p| serde_json::to_string(p).ok()),
            new_values: serde_json::to_string(&product).ok(),
            ..Default::default()
        },
    )
    .await;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.products().delete(id).await?;

    audit::record_activity(
        &state.db,
        audit::create_entry(auth.user_id, "DELETE_PRODUCT", "products", id, None),
    )
    .await;

    Ok(Json(json!({ "deleted": id })))
}
