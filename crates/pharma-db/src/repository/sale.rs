//! # Sale Repository
//!
//! Database operations for sales and sale items, including the sale
//! commit transaction.
//!
//! ## Commit Transaction
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                   record_sale(NewSale)                         │
//! │                                                                │
//! │  BEGIN                                                         │
//! │    INSERT INTO sales (...)          → sale_id                  │
//! │    for each line:                                              │
//! │      UPDATE products                                           │
//! │        SET stock = stock - qty      → 0 rows? ROLLBACK         │
//! │      INSERT INTO sale_items (...)                              │
//! │  COMMIT                                                        │
//! │                                                                │
//! │  Any failure before COMMIT rolls everything back: no sale      │
//! │  row, no item rows, no stock movement.                         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Duplicate product lines are NOT merged; each decrements stock on its
//! own. Stock is not clamped at zero, an oversell goes negative and is
//! caught by the low-stock alert scan instead.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pharma_core::{NewSale, Sale, SaleItemDetail, SaleSummary};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a sale atomically and returns its assigned id.
    ///
    /// Inserts the sale header, then per line decrements stock and inserts
    /// the item row, all inside one transaction. A line referencing a
    /// product that does not exist aborts the whole sale with
    /// [`DbError::NotFound`].
    ///
    /// There is no idempotency key: calling this twice with the same input
    /// records two sales.
    pub async fn record_sale(&self, new: &NewSale) -> DbResult<i64> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                customer_name, user_id, total_cents,
                amount_tendered_cents, change_cents, payment_method, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&new.customer_name)
        .bind(new.user_id)
        .bind(new.total_cents)
        .bind(new.amount_tendered_cents)
        .bind(new.change_cents)
        .bind(new.payment_method)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let sale_id = result.last_insert_rowid();

        for item in &new.items {
            // Stock decrement doubles as the existence check: zero rows
            // means the product id is unknown, and dropping the open
            // transaction rolls back the header and any earlier lines.
            let updated = sqlx::query(
                "UPDATE products SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3",
            )
            .bind(item.quantity)
            .bind(now)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(DbError::not_found("Product", item.product_id));
            }

            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(sale_id, items = new.items.len(), total_cents = new.total_cents, "Sale committed");

        Ok(sale_id)
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_name, user_id, total_cents,
                   amount_tendered_cents, change_cents, payment_method, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets a sale by id with the cashier's name joined, for the invoice.
    pub async fn get_summary(&self, id: i64) -> DbResult<Option<SaleSummary>> {
        let sale = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT s.id, s.customer_name, s.user_id, s.total_cents,
                   s.amount_tendered_cents, s.change_cents, s.payment_method, s.created_at,
                   u.name AS user_name
            FROM sales s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE s.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists sales newest first, joined with the cashier's name.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<SaleSummary>> {
        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT s.id, s.customer_name, s.user_id, s.total_cents,
                   s.amount_tendered_cents, s.change_cents, s.payment_method, s.created_at,
                   u.name AS user_name
            FROM sales s
            LEFT JOIN users u ON u.id = s.user_id
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the sales of one calendar day (`YYYY-MM-DD`), newest first.
    ///
    /// Matches on the stored timestamp's date prefix, same trick as the
    /// report aggregates.
    pub async fn list_by_day(&self, day: &str) -> DbResult<Vec<SaleSummary>> {
        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT s.id, s.customer_name, s.user_id, s.total_cents,
                   s.amount_tendered_cents, s.change_cents, s.payment_method, s.created_at,
                   u.name AS user_name
            FROM sales s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE substr(s.created_at, 1, 10) = ?1
            ORDER BY s.created_at DESC, s.id DESC
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets the lines of a sale with product names joined in.
    pub async fn items(&self, sale_id: i64) -> DbResult<Vec<SaleItemDetail>> {
        let items = sqlx::query_as::<_, SaleItemDetail>(
            r#"
            SELECT i.id, i.sale_id, i.product_id, i.quantity, i.unit_price_cents,
                   p.name AS product_name
            FROM sale_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.sale_id = ?1
            ORDER BY i.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Number of sale rows, used by tests and diagnostics.
    pub async fn count(&self) -> DbResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pharma_core::{
        AccountStatus, NewProduct, NewSaleItem, NewUser, PaymentMethod, UserRole,
    };

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

    fn sale(user_id: i64, total: i64, tendered: Option<i64>, items: Vec<NewSaleItem>) -> NewSale {
        let change = tendered.map(|t| t - total);
        NewSale {
            customer_name: None,
            user_id,
            total_cents: total,
            amount_tendered_cents: tendered,
            change_cents: change,
            payment_method: PaymentMethod::Cash,
            items,
        }
    }

    fn item(product_id: i64, quantity: i64, unit_price_cents: i64) -> NewSaleItem {
        NewSaleItem {
            product_id,
            quantity,
            unit_price_cents,
        }
    }

    #[tokio::test]
    async fn test_record_sale_decrements_stock() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Paracetamol 500mg", 45, 500).await;

        let sale_id = db
            .sales()
            .record_sale(&sale(user_id, 1000, Some(1000), vec![item(pid, 2, 500)]))
            .await
            .unwrap();

        let stored = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 1000);
        assert_eq!(stored.change_cents, Some(0));

        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, 43);

        let items = db.sales().items(sale_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name.as_deref(), Some("Paracetamol 500mg"));
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_everything() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Amoxicillin", 30, 800).await;

        let err = db
            .sales()
            .record_sale(&sale(
                user_id,
                1600,
                Some(2000),
                vec![item(pid, 1, 800), item(9999, 1, 800)],
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // No sale, no items, no stock movement. The first line's decrement
        // was undone by the rollback.
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, 30);
    }

    #[tokio::test]
    async fn test_duplicate_lines_both_decrement() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Vitamin C", 45, 500).await;

        let sale_id = db
            .sales()
            .record_sale(&sale(
                user_id,
                2500,
                None,
                vec![item(pid, 2, 500), item(pid, 3, 500)],
            ))
            .await
            .unwrap();

        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, 40);

        let items = db.sales().items(sale_id).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_record_sale_is_not_idempotent() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Aspirin", 20, 400).await;

        let payload = sale(user_id, 400, Some(500), vec![item(pid, 1, 400)]);
        let first = db.sales().record_sale(&payload).await.unwrap();
        let second = db.sales().record_sale(&payload).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(db.sales().count().await.unwrap(), 2);
        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, 18);
    }

    #[tokio::test]
    async fn test_oversell_goes_negative() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Rare Syrup", 1, 1000).await;

        db.sales()
            .record_sale(&sale(user_id, 3000, None, vec![item(pid, 3, 1000)]))
            .await
            .unwrap();

        let product = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(product.stock, -2);
    }

    #[tokio::test]
    async fn test_negative_change_is_stored() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Cough Syrup", 10, 1500).await;

        let sale_id = db
            .sales()
            .record_sale(&sale(user_id, 1500, Some(1000), vec![item(pid, 1, 1500)]))
            .await
            .unwrap();

        let stored = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(stored.change_cents, Some(-500));
    }

    #[tokio::test]
    async fn test_list_by_day_filters_on_date() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Ibuprofen", 10, 600).await;

        db.sales()
            .record_sale(&sale(user_id, 600, Some(1000), vec![item(pid, 1, 600)]))
            .await
            .unwrap();

        let today = Utc::now().date_naive().to_string();
        let todays = db.sales().list_by_day(&today).await.unwrap();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].total_cents, 600);
        assert_eq!(todays[0].user_name.as_deref(), Some("Cashier"));

        assert!(db.sales().list_by_day("1999-01-01").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_joins_cashier_name() {
        let db = test_db().await;
        let user_id = seed_cashier(&db).await;
        let pid = seed_product(&db, "Zinc", 10, 200).await;

        db.sales()
            .record_sale(&sale(user_id, 200, None, vec![item(pid, 1, 200)]))
            .await
            .unwrap();

        let listed = db.sales().list(50).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_name.as_deref(), Some("Cashier"));
    }
}
