//! # User Repository
//!
//! Database operations for user accounts.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pharma_core::{AccountStatus, NewUser, User, UserRole};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user and returns it with its assigned id.
    ///
    /// The password must already be hashed; this layer never sees clear
    /// text.
    pub async fn create(&self, new: &NewUser) -> DbResult<User> {
        debug!(username = %new.username, "Creating user");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, username, email, password_hash, phone, role, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(&new.name)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.phone)
        .bind(new.role)
        .bind(new.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DbError::Internal("inserted user not found".to_string()))
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, password_hash, phone, role, status,
                   created_at, updated_at, last_login
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username, the login lookup.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, password_hash, phone, role, status,
                   created_at, updated_at, last_login
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username or email address, the login lookup.
    ///
    /// The till login field accepts either, so one query covers both.
    pub async fn get_by_username_or_email(&self, identifier: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, password_hash, phone, role, status,
                   created_at, updated_at, last_login
            FROM users
            WHERE username = ?1 OR email = ?1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, newest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, password_hash, phone, role, status,
                   created_at, updated_at, last_login
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Updates profile fields of a user.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        role: UserRole,
        status: AccountStatus,
    ) -> DbResult<User> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?2,
                email = ?3,
                phone = ?4,
                role = ?5,
                status = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(role)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Replaces a user's password hash.
    pub async fn update_password(&self, id: i64, password_hash: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Stamps last_login, called on every successful login.
    pub async fn touch_last_login(&self, id: i64) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query("UPDATE users SET last_login = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes a user.
    ///
    /// Fails with a foreign key violation if the user has recorded sales;
    /// deactivate the account instead in that case.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            username: username.to_string(),
            email: None,
            password_hash: "$argon2id$fake".to_string(),
            phone: None,
            role: UserRole::Cashier,
            status: AccountStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_username() {
        let db = test_db().await;
        let created = db.users().create(&new_user("cashier1")).await.unwrap();

        let found = db
            .users()
            .get_by_username("cashier1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, UserRole::Cashier);
    }

    #[tokio::test]
    async fn test_login_lookup_accepts_email() {
        let db = test_db().await;
        let mut new = new_user("fatima");
        new.email = Some("fatima@pharmacare.test".to_string());
        let created = db.users().create(&new).await.unwrap();

        let by_email = db
            .users()
            .get_by_username_or_email("fatima@pharmacare.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        let by_username = db
            .users()
            .get_by_username_or_email("fatima")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_username.id, created.id);

        assert!(db
            .users()
            .get_by_username_or_email("nobody@pharmacare.test")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        db.users().create(&new_user("admin")).await.unwrap();

        let err = db.users().create(&new_user("admin")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_touch_last_login() {
        let db = test_db().await;
        let user = db.users().create(&new_user("u1")).await.unwrap();
        assert!(user.last_login.is_none());

        db.users().touch_last_login(user.id).await.unwrap();
        let user = db.users().get_by_id(user.id).await.unwrap().unwrap();
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let db = test_db().await;
        let err = db
            .users()
            .update(999, "x", None, None, UserRole::Admin, AccountStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
