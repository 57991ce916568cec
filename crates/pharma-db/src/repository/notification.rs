//! # Notification Repository
//!
//! Database operations for dashboard notifications (low stock, expiry
//! warnings, system messages).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use pharma_core::{NewNotification, Notification};

/// Repository for notification database operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NotificationRepository { pool }
    }

    /// Inserts a notification and returns it with its assigned id.
    pub async fn create(&self, new: &NewNotification) -> DbResult<Notification> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (kind, title, message, user_id, is_read, created_at)
            VALUES (?1, ?2, ?3, ?4, 0, ?5)
            "#,
        )
        .bind(new.kind)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DbError::Internal("inserted notification not found".to_string()))
    }

    /// Gets a notification by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, kind, title, message, user_id, is_read, created_at
            FROM notifications
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Lists notifications newest first.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, kind, title, message, user_id, is_read, created_at
            FROM notifications
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Number of unread notifications, for the dashboard badge.
    pub async fn unread_count(&self) -> DbResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_read = 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(n)
    }

    /// Marks one notification as read.
    pub async fn mark_read(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Notification", id));
        }

        Ok(())
    }

    /// Marks every notification as read.
    pub async fn mark_all_read(&self) -> DbResult<u64> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE is_read = 0")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a notification.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Notification", id));
        }

        Ok(())
    }

    /// True when an identical message was already raised after `since`.
    ///
    /// The daily alert scan uses this to avoid re-raising the same low
    /// stock or expiry warning on every run.
    pub async fn exists_since(&self, message: &str, since: DateTime<Utc>) -> DbResult<bool> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE message = ?1 AND created_at >= ?2",
        )
        .bind(message)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(n > 0)
    }
}
