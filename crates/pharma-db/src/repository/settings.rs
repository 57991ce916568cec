//! # Settings Repository
//!
//! Key/value system settings (pharmacy name, currency, alert thresholds).

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use pharma_core::{Setting, SettingType};

/// Repository for settings operations.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Lists every setting, by key.
    pub async fn list(&self) -> DbResult<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>(
            r#"
            SELECT setting_key, setting_value, setting_type, description, updated_at
            FROM settings
            ORDER BY setting_key
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Gets one setting by key.
    pub async fn get(&self, key: &str) -> DbResult<Option<Setting>> {
        let setting = sqlx::query_as::<_, Setting>(
            r#"
            SELECT setting_key, setting_value, setting_type, description, updated_at
            FROM settings
            WHERE setting_key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Inserts or replaces a setting value, keeping any existing
    /// description when the caller passes none.
    pub async fn upsert(
        &self,
        key: &str,
        value: Option<&str>,
        setting_type: SettingType,
        description: Option<&str>,
    ) -> DbResult<Setting> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO settings (setting_key, setting_value, setting_type, description, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(setting_key) DO UPDATE SET
                setting_value = excluded.setting_value,
                setting_type = excluded.setting_type,
                description = COALESCE(excluded.description, settings.description),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(setting_type)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(key)
            .await?
            .ok_or_else(|| DbError::not_found("Setting", key))
    }
}
