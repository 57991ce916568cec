//! Sale endpoints.
//!
//! `create` is the commit operation the whole system revolves around;
//! the heavy lifting lives in [`crate::services::sale_service`].

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pharma_core::{Sale, SaleItemDetail, SaleSummary, Setting};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::sale_service::{CreateSaleRequest, SaleReceipt};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Sale with its line items.
#[derive(Debug, Serialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItemDetail>,
}

/// Printable invoice: the sale, its lines, and the pharmacy settings
/// the receipt header is rendered from.
#[derive(Debug, Serialize)]
pub struct Invoice {
    pub sale: SaleSummary,
    pub items: Vec<SaleItemDetail>,
    pub pharmacy: serde_json::Map<String, Value>,
}

/// One sale of a day's history, line items nested.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub sale: SaleSummary,
    pub items: Vec<SaleItemDetail>,
}

/// A full day of sales with its totals.
#[derive(Debug, Serialize)]
pub struct SalesHistory {
    pub date: String,
    pub total_orders: usize,
    pub total_sales_cents: i64,
    pub sales: Vec<HistoryEntry>,
}

/// `POST /api/sales`
///
/// The sale is attributed to the authenticated cashier, not to any id
/// in the request body.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSaleRequest>,
) -> Result<Json<SaleReceipt>, ApiError> {
    let receipt = state.sales.record_sale(auth.user_id, req).await?;
    Ok(Json(receipt))
}

/// `GET /api/sales`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SaleSummary>>, ApiError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    Ok(Json(state.db.sales().list(limit).await?))
}

/// `GET /api/sales/{id}`
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SaleDetail>, ApiError> {
    let sale = state
        .db
        .sales()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Sale not found: {id}")))?;

    let items = state.db.sales().items(id).await?;

    Ok(Json(SaleDetail { sale, items }))
}

/// `GET /api/sales/{id}/invoice`
pub async fn invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Invoice>, ApiError> {
    let sale = state
        .db
        .sales()
        .get_summary(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Sale not found: {id}")))?;

    let items = state.db.sales().items(id).await?;
    let settings = state.db.settings().list().await?;

    Ok(Json(Invoice {
        sale,
        items,
        pharmacy: pharmacy_map(&settings),
    }))
}

/// `GET /api/sales/history/{date}`
///
/// All sales of one day with their line items and the day's totals.
pub async fn history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(date): Path<String>,
) -> Result<Json<SalesHistory>, ApiError> {
    if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        return Err(ApiError::Validation(
            "date must be formatted as YYYY-MM-DD".to_string(),
        ));
    }

    let sales = state.db.sales().list_by_day(&date).await?;
    let total_sales_cents = sales.iter().map(|s| s.total_cents).sum();

    let mut entries = Vec::with_capacity(sales.len());
    for sale in sales {
        let items = state.db.sales().items(sale.id).await?;
        entries.push(HistoryEntry { sale, items });
    }

    Ok(Json(SalesHistory {
        date,
        total_orders: entries.len(),
        total_sales_cents,
        sales: entries,
    }))
}

/// Flattens the settings rows into the key/value object the invoice
/// header consumes.
fn pharmacy_map(settings: &[Setting]) -> serde_json::Map<String, Value> {
    settings
        .iter()
        .map(|s| {
            let value = match &s.setting_value {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            };
            (s.setting_key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pharma_core::SettingType;

    fn setting(key: &str, value: Option<&str>) -> Setting {
        Setting {
            setting_key: key.to_string(),
            setting_value: value.map(|v| v.to_string()),
            setting_type: SettingType::String,
            description: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_pharmacy_map_keys_settings_by_name() {
        let settings = vec![
            setting("pharmacy_name", Some("PharmaCare")),
            setting("pharmacy_address", None),
        ];

        let map = pharmacy_map(&settings);
        assert_eq!(map["pharmacy_name"], Value::String("PharmaCare".to_string()));
        assert_eq!(map["pharmacy_address"], Value::Null);
    }
}
