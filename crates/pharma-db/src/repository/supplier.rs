//! # Supplier Repository

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pharma_core::{NewSupplier, Supplier};

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Inserts a supplier and returns it with its assigned id.
    pub async fn create(&self, new: &NewSupplier) -> DbResult<Supplier> {
        debug!(name = %new.name, "Creating supplier");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (name, contact, email, phone, address, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&new.name)
        .bind(&new.contact)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(new.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DbError::Internal("inserted supplier not found".to_string()))
    }

    /// Gets a supplier by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact, email, phone, address, status, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Lists all suppliers, alphabetically.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact, email, phone, address, status, created_at, updated_at
            FROM suppliers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Updates a supplier in place.
    pub async fn update(&self, id: i64, new: &NewSupplier) -> DbResult<Supplier> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                contact = ?3,
                email = ?4,
                phone = ?5,
                address = ?6,
                status = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.contact)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(new.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Deletes a supplier. Products referencing it keep existing with a
    /// NULL supplier (ON DELETE SET NULL).
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pharma_core::AccountStatus;

    fn new_supplier(name: &str) -> NewSupplier {
        NewSupplier {
            name: name.to_string(),
            contact: Some("Dr. Dupont".to_string()),
            email: None,
            phone: None,
            address: None,
            status: AccountStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_supplier_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let created = repo.create(&new_supplier("PharmaDistrib")).await.unwrap();
        assert_eq!(created.name, "PharmaDistrib");

        let mut update = new_supplier("PharmaDistrib SA");
        update.status = AccountStatus::Inactive;
        let updated = repo.update(created.id, &update).await.unwrap();
        assert_eq!(updated.name, "PharmaDistrib SA");
        assert_eq!(updated.status, AccountStatus::Inactive);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_supplier() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.suppliers().delete(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
