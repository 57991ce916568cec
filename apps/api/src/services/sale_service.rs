//! Sale commit orchestration.
//!
//! The flow for `POST /api/sales`:
//!
//! 1. Validate the cart (no side effects on failure)
//! 2. Compute the authoritative total from the submitted lines
//! 3. Compute change when an amount was tendered
//! 4. Commit the sale atomically through pharma-db
//! 5. Append a `CREATE_SALE` audit entry, best effort
//!
//! Steps 1-3 are pure pharma-core calls; step 4 is the only one that can
//! partially fail, and it rolls back as a unit.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use pharma_core::checkout::{compute_change, compute_total, CartLine};
use pharma_core::validation::{validate_amount_tendered, validate_cart};
use pharma_core::{CoreError, NewSale, NewSaleItem, PaymentMethod};
use pharma_db::Database;

use crate::error::ApiError;
use crate::services::audit;

/// Request body for recording a sale.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_name: Option<String>,
    pub items: Vec<CartLine>,
    pub amount_tendered_cents: Option<i64>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Response body: what the till needs to finish the transaction.
#[derive(Debug, Clone, Serialize)]
pub struct SaleReceipt {
    pub sale_id: i64,
    pub total_cents: i64,
    /// Absent when no amount was tendered. Negative means the customer
    /// still owes money (underpayment recorded, not rejected).
    pub change_cents: Option<i64>,
}

/// Service owning the sale commit flow.
#[derive(Clone)]
pub struct SaleService {
    db: Database,
    reject_underpayment: bool,
}

impl SaleService {
    /// Creates the service. `reject_underpayment` turns shortfalls into
    /// 400s instead of recording negative change.
    pub fn new(db: Database, reject_underpayment: bool) -> Self {
        SaleService {
            db,
            reject_underpayment,
        }
    }

    /// Records a sale on behalf of `user_id` and returns the receipt.
    pub async fn record_sale(
        &self,
        user_id: i64,
        req: CreateSaleRequest,
    ) -> Result<SaleReceipt, ApiError> {
        validate_cart(&req.items)?;
        if let Some(tendered) = req.amount_tendered_cents {
            validate_amount_tendered(tendered)?;
        }

        // The stored total is always recomputed server-side from the
        // submitted lines; a client-supplied total would be ignored.
        let total = compute_total(&req.items);
        let change_cents = compute_change(total, req.amount_tendered_cents);

        if self.reject_underpayment {
            if let (Some(change), Some(tendered)) = (change_cents, req.amount_tendered_cents) {
                if change < 0 {
                    return Err(CoreError::Underpayment {
                        total_cents: total.cents(),
                        tendered_cents: tendered,
                    }
                    .into());
                }
            }
        }

        let new_sale = NewSale {
            customer_name: req.customer_name,
            user_id,
            total_cents: total.cents(),
            amount_tendered_cents: req.amount_tendered_cents,
            change_cents,
            payment_method: req.payment_method,
            items: req
                .items
                .iter()
                .map(|line| NewSaleItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                })
                .collect(),
        };

        let sale_id = self.db.sales().record_sale(&new_sale).await?;

        info!(sale_id, user_id, total_cents = total.cents(), "Sale recorded");

        // The sale is committed; a failed audit write must not undo it.
        audit::record_activity(
            &self.db,
            audit::create_entry(
                user_id,
                "CREATE_SALE",
                "sales",
                sale_id,
                Some(
                    json!({
                        "customer_name": new_sale.customer_name,
                        "total_cents": total.cents(),
                        "amount_tendered_cents": new_sale.amount_tendered_cents,
                        "change_cents": change_cents,
                        "items": new_sale.items.len(),
                        "payment_method": new_sale.payment_method,
                    })
                    .to_string(),
                ),
            ),
        )
        .await;

        Ok(SaleReceipt {
            sale_id,
            total_cents: total.cents(),
            change_cents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pharma_core::{AccountStatus, NewProduct, NewUser, UserRole};
    use pharma_db::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_cashier(db: &Database) -> i64 {
        db.users()
            .create(&NewUser {
                name: "Cashier".to_string(),
                username: "cashier".to_string(),
                email: None,
                password_hash: "$argon2id$fake".to_string(),
                phone: None,
                role: UserRole::Cashier,
                status: AccountStatus::Active,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_product(db: &Database, name: &str, stock: i64, price_cents: i64) -> i64 {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                category_id: None,
                purchase_price_cents: 0,
                price_cents,
                stock,
                min_stock: 5,
                supplier_id: None,
                expiry_date: None,
                batch_number: None,
            })
            .await
            .unwrap()
            .id
    }

    fn line(product_id: i64, quantity: i64, unit_price_cents: i64) -> CartLine {
        CartLine {
            product_id,
            quantity,
            unit_price_cents,
        }
    }

    fn request(items: Vec<CartLine>, tendered: Option<i64>) -> CreateSaleRequest {
        CreateSaleRequest {
            customer_name: None,
            items,
            amount_tendered_cents: tendered,
            payment_method: PaymentMethod::Cash,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_receipt() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;

        // Pin the product id so the receipt is fully deterministic.
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO products (id, name, purchase_price_cents, price_cents,
                                  stock, min_stock, created_at, updated_at)
            VALUES (7, 'Paracetamol 500mg', 300, 500, 45, 20, ?1, ?1)
            "#,
        )
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let service = SaleService::new(db.clone(), false);
        let receipt = service
            .record_sale(user_id, request(vec![line(7, 2, 500)], Some(1000)))
            .await
            .unwrap();

        assert_eq!(receipt.total_cents, 1000);
        assert_eq!(receipt.change_cents, Some(0));

        let product = db.products().get_by_id(7).await.unwrap().unwrap();
        assert_eq!(product.stock, 43);

        let sale = db
            .sales()
            .get_by_id(receipt.sale_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sale.total_cents, 1000);
        assert_eq!(sale.user_id, user_id);
    }

    #[tokio::test]
    async fn test_change_overpayment_and_underpayment() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Syrup", 20, 1500).await;

        let service = SaleService::new(db.clone(), false);

        let over = service
            .record_sale(user_id, request(vec![line(pid, 1, 1500)], Some(2000)))
            .await
            .unwrap();
        assert_eq!(over.change_cents, Some(500));

        // Underpayment commits and records negative change.
        let under = service
            .record_sale(user_id, request(vec![line(pid, 1, 1500)], Some(1000)))
            .await
            .unwrap();
        assert_eq!(under.change_cents, Some(-500));

        let stored = db.sales().get_by_id(under.sale_id).await.unwrap().unwrap();
        assert_eq!(stored.change_cents, Some(-500));
    }

    #[tokio::test]
    async fn test_underpayment_rejected_when_policy_enabled() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Syrup", 20, 1500).await;

        let service = SaleService::new(db.clone(), true);

        let err = service
            .record_sale(user_id, request(vec![line(pid, 1, 1500)], Some(1000)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // Nothing was committed.
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, 20);
    }

    #[tokio::test]
    async fn test_bad_product_aborts_whole_sale() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Aspirin", 30, 400).await;

        let service = SaleService::new(db.clone(), false);
        let err = service
            .record_sale(
                user_id,
                request(vec![line(pid, 1, 400), line(9999, 1, 400)], None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        assert_eq!(db.sales().count().await.unwrap(), 0);
        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, 30);
    }

    #[tokio::test]
    async fn test_duplicate_lines_conserve_stock() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Vitamin C", 45, 500).await;

        let service = SaleService::new(db.clone(), false);
        service
            .record_sale(
                user_id,
                request(vec![line(pid, 2, 500), line(pid, 3, 500)], None),
            )
            .await
            .unwrap();

        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, 40);
    }

    #[tokio::test]
    async fn test_not_idempotent() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Zinc", 20, 200).await;

        let service = SaleService::new(db.clone(), false);
        let req = request(vec![line(pid, 1, 200)], Some(200));

        let first = service.record_sale(user_id, req.clone()).await.unwrap();
        let second = service.record_sale(user_id, req).await.unwrap();

        assert_ne!(first.sale_id, second.sale_id);
        assert_eq!(db.sales().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;

        let service = SaleService::new(db, false);
        let err = service
            .record_sale(user_id, request(vec![], None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_block_sale() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Bandages", 10, 300).await;

        // Break the audit table; the commit path must not care.
        sqlx::query("DROP TABLE activity_logs")
            .execute(db.pool())
            .await
            .unwrap();

        let service = SaleService::new(db.clone(), false);
        let receipt = service
            .record_sale(user_id, request(vec![line(pid, 1, 300)], Some(500)))
            .await
            .unwrap();

        assert_eq!(receipt.change_cents, Some(200));
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sale_writes_audit_entry() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Gauze", 10, 300).await;

        let service = SaleService::new(db.clone(), false);
        let receipt = service
            .record_sale(user_id, request(vec![line(pid, 1, 300)], None))
            .await
            .unwrap();

        let entries = db.activity().list_by_action("CREATE_SALE", 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record_id, Some(receipt.sale_id));
        assert_eq!(entries[0].table_name.as_deref(), Some("sales"));
    }
}
