//! # Activity Log Repository
//!
//! Append-only audit trail. Entries are written after their parent
//! operation commits and never block it; the service layer logs a write
//! failure and moves on.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::DbResult;
use pharma_core::{ActivityLogView, NewActivityEntry};

/// Repository for activity log operations.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityLogRepository { pool }
    }

    /// Appends an audit entry.
    pub async fn record(&self, entry: &NewActivityEntry) -> DbResult<i64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO activity_logs (
                user_id, action, table_name, record_id,
                old_values, new_values, ip_address, user_agent, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.table_name)
        .bind(entry.record_id)
        .bind(&entry.old_values)
        .bind(&entry.new_values)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Lists entries newest first, joined with the actor's name.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<ActivityLogView>> {
        let entries = sqlx::query_as::<_, ActivityLogView>(
            r#"
            SELECT a.id, a.user_id, a.action, a.table_name, a.record_id,
                   a.old_values, a.new_values, a.ip_address, a.user_agent, a.created_at,
                   u.name AS user_name
            FROM activity_logs a
            LEFT JOIN users u ON u.id = a.user_id
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Lists entries for one action type (e.g. `CREATE_SALE`).
    pub async fn list_by_action(&self, action: &str, limit: i64) -> DbResult<Vec<ActivityLogView>> {
        let entries = sqlx::query_as::<_, ActivityLogView>(
            r#"
            SELECT a.id, a.user_id, a.action, a.table_name, a.record_id,
                   a.old_values, a.new_values, a.ip_address, a.user_agent, a.created_at,
                   u.name AS user_name
            FROM activity_logs a
            LEFT JOIN users u ON u.id = a.user_id
            WHERE a.action = ?1
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT ?2
            "#,
        )
        .bind(action)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pharma_core::{AccountStatus, NewUser, UserRole};

    async fn seed_user(db: &Database) -> i64 {
        db.users()
            .create(&NewUser {
                name: "Admin".to_string(),
                username: "admin".to_string(),
                email: None,
                password_hash: "$argon2id$fake".to_string(),
                phone: None,
                role: UserRole::Admin,
                status: AccountStatus::Active,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_record_and_filter_by_action() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user_id = seed_user(&db).await;

        db.activity()
            .record(&NewActivityEntry {
                user_id,
                action: "CREATE_SALE".to_string(),
                table_name: Some("sales".to_string()),
                record_id: Some(1),
                new_values: Some(r#"{"total_cents":1000}"#.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        db.activity()
            .record(&NewActivityEntry {
                user_id,
                action: "LOGIN".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let all = db.activity().list(50).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_name.as_deref(), Some("Admin"));

        let sales_only = db.activity().list_by_action("CREATE_SALE", 50).await.unwrap();
        assert_eq!(sales_only.len(), 1);
        assert_eq!(sales_only[0].record_id, Some(1));
    }
}
