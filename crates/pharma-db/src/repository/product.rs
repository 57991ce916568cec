//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! Stock mutations that belong to a sale do NOT happen here; the sale
//! commit transaction in [`crate::repository::sale`] owns those so that
//! the decrement and the sale rows share one transaction.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pharma_core::{NewProduct, Product, ProductSummary};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.name, p.category_id, p.purchase_price_cents, p.price_cents,
           p.stock, p.min_stock, p.supplier_id, p.expiry_date, p.batch_number,
           p.created_at, p.updated_at,
           c.name AS category_name,
           s.name AS supplier_name
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns it with its assigned id.
    pub async fn create(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, "Creating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, category_id, purchase_price_cents, price_cents,
                stock, min_stock, supplier_id, expiry_date, batch_number,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
        )
        .bind(&new.name)
        .bind(new.category_id)
        .bind(new.purchase_price_cents)
        .bind(new.price_cents)
        .bind(new.stock)
        .bind(new.min_stock)
        .bind(new.supplier_id)
        .bind(new.expiry_date)
        .bind(&new.batch_number)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DbError::Internal("inserted product not found".to_string()))
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category_id, purchase_price_cents, price_cents,
                   stock, min_stock, supplier_id, expiry_date, batch_number,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists the catalog with category and supplier names joined in,
    /// alphabetically.
    pub async fn list(&self) -> DbResult<Vec<ProductSummary>> {
        let sql = format!("{SUMMARY_SELECT} ORDER BY p.name");

        let products = sqlx::query_as::<_, ProductSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Updates a product in place.
    ///
    /// Overwrites stock with the supplied value; sale-driven decrements go
    /// through the sale commit transaction instead.
    pub async fn update(&self, id: i64, new: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category_id = ?3,
                purchase_price_cents = ?4,
                price_cents = ?5,
                stock = ?6,
                min_stock = ?7,
                supplier_id = ?8,
                expiry_date = ?9,
                batch_number = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(new.category_id)
        .bind(new.purchase_price_cents)
        .bind(new.price_cents)
        .bind(new.stock)
        .bind(new.min_stock)
        .bind(new.supplier_id)
        .bind(new.expiry_date)
        .bind(&new.batch_number)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Fails with a foreign key violation when sale history references it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Products at or below their reorder threshold.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category_id, purchase_price_cents, price_cents,
                   stock, min_stock, supplier_id, expiry_date, batch_number,
                   created_at, updated_at
            FROM products
            WHERE stock <= min_stock
            ORDER BY stock
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Products whose expiry date falls on or before `cutoff`.
    ///
    /// Already-expired products are included; the alert scan wants both.
    pub async fn expiring_before(&self, cutoff: NaiveDate) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category_id, purchase_price_cents, price_cents,
                   stock, min_stock, supplier_id, expiry_date, batch_number,
                   created_at, updated_at
            FROM products
            WHERE expiry_date IS NOT NULL AND expiry_date <= ?1
            ORDER BY expiry_date
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn new_product(name: &str, stock: i64, min_stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category_id: None,
            purchase_price_cents: 300,
            price_cents: 500,
            stock,
            min_stock,
            supplier_id: None,
            expiry_date: None,
            batch_number: None,
        }
    }

    #[tokio::test]
    async fn test_product_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.create(&new_product("Ibuprofen 400mg", 30, 10)).await.unwrap();
        assert_eq!(created.stock, 30);

        let mut change = new_product("Ibuprofen 400mg", 25, 10);
        change.price_cents = 700;
        let updated = repo.update(created.id, &change).await.unwrap();
        assert_eq!(updated.price_cents, 700);
        assert_eq!(updated.stock, 25);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_joins_category_and_supplier_names() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let cat = db
            .categories()
            .create(&pharma_core::NewCategory {
                name: "Analgesics".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let mut p = new_product("Paracetamol 500mg", 45, 20);
        p.category_id = Some(cat.id);
        db.products().create(&p).await.unwrap();

        let listed = db.products().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category_name.as_deref(), Some("Analgesics"));
        assert!(listed[0].supplier_name.is_none());
    }

    #[tokio::test]
    async fn test_low_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.create(&new_product("Plenty", 50, 10)).await.unwrap();
        repo.create(&new_product("AtThreshold", 10, 10)).await.unwrap();
        repo.create(&new_product("Below", 2, 10)).await.unwrap();

        let low = repo.low_stock().await.unwrap();
        assert_eq!(low.len(), 2);
        assert_eq!(low[0].name, "Below");
    }

    #[tokio::test]
    async fn test_expiring_before() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut soon = new_product("Soon", 10, 1);
        soon.expiry_date = NaiveDate::from_ymd_opt(2026, 2, 1);
        repo.create(&soon).await.unwrap();

        let mut later = new_product("Later", 10, 1);
        later.expiry_date = NaiveDate::from_ymd_opt(2027, 1, 1);
        repo.create(&later).await.unwrap();

        repo.create(&new_product("NoExpiry", 10, 1)).await.unwrap();

        let cutoff = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let expiring = repo.expiring_before(cutoff).await.unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].name, "Soon");
    }
}
