//! JSON backup of the whole database.
//!
//! Dumps every table into one timestamped JSON file under the configured
//! backup directory. This is a convenience export for a single-pharmacy
//! deployment, not a substitute for copying the SQLite file.

use chrono::Utc;
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

use pharma_db::Database;

use crate::error::ApiError;

/// Result of a backup run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BackupSummary {
    pub path: String,
    pub users: usize,
    pub suppliers: usize,
    pub categories: usize,
    pub products: usize,
    pub sales: usize,
    pub notifications: usize,
    pub settings: usize,
}

/// Dumps all tables to `<backup_dir>/backup-YYYYMMDD-HHMMSS.json`.
///
/// Sales are exported with their line items nested under each sale.
pub async fn run(db: &Database, backup_dir: &str) -> Result<BackupSummary, ApiError> {
    let users = db.users().list().await?;
    let suppliers = db.suppliers().list().await?;
    let categories = db.categories().list().await?;
    let products = db.products().list().await?;
    let sales = db.sales().list(i64::MAX).await?;
    let notifications = db.notifications().list(i64::MAX).await?;
    let settings = db.settings().list().await?;

    let mut sales_with_items = Vec::with_capacity(sales.len());
    for sale in &sales {
        let items = db.sales().items(sale.id).await?;
        sales_with_items.push(json!({
            "sale": sale,
            "items": items,
        }));
    }

    let document = json!({
        "created_at": Utc::now(),
        "users": users,
        "suppliers": suppliers,
        "categories": categories,
        "products": products,
        "sales": sales_with_items,
        "notifications": notifications,
        "settings": settings,
    });

    tokio::fs::create_dir_all(backup_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create backup dir: {}", e)))?;

    let filename = format!("backup-{}.json", Utc::now().format("%Y%m%d-%H%M%S"));
    let path = format!("{}/{}", backup_dir.trim_end_matches('/'), filename);

    let body = serde_json::to_vec_pretty(&document)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize backup: {}", e)))?;

    tokio::fs::write(&path, body)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to write backup: {}", e)))?;

    info!(%path, sales = sales.len(), products = products.len(), "Backup written");

    Ok(BackupSummary {
        path,
        users: users.len(),
        suppliers: suppliers.len(),
        categories: categories.len(),
        products: products.len(),
        sales: sales.len(),
        notifications: notifications.len(),
        settings: settings.len(),
    })
}

/// Spawns the daily backup loop, on the same cadence as the alert scan.
/// A failed backup is logged and retried on the next tick.
pub fn spawn_daily(db: Database, backup_dir: String) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(24 * 60 * 60));

        loop {
            // First tick fires immediately, giving a backup at startup.
            interval.tick().await;

            match run(&db, &backup_dir).await {
                Ok(summary) => info!(path = %summary.path, "Scheduled backup written"),
                Err(e) => error!(error = %e, "Scheduled backup failed"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharma_core::{NewCategory, NewProduct};
    use pharma_db::DbConfig;

    #[tokio::test]
    async fn test_backup_writes_file_with_counts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.categories()
            .create(&NewCategory {
                name: "Analgesics".to_string(),
                description: None,
            })
            .await
            .unwrap();
        db.products()
            .create(&NewProduct {
                name: "Paracetamol 500mg".to_string(),
                category_id: None,
                purchase_price_cents: 300,
                price_cents: 500,
                stock: 45,
                min_stock: 20,
                supplier_id: None,
                expiry_date: None,
                batch_number: None,
            })
            .await
            .unwrap();

        let dir = std::env::temp_dir().join(format!("pharma-backup-{}", std::process::id()));
        let dir = dir.to_string_lossy().to_string();

        let summary = run(&db, &dir).await.unwrap();
        assert_eq!(summary.categories, 1);
        assert_eq!(summary.products, 1);
        assert_eq!(summary.sales, 0);

        let content = tokio::fs::read_to_string(&summary.path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["products"].as_array().unwrap().len(), 1);
        // Password hashes never leave the database, even in backups.
        assert!(!content.contains("password_hash"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_spawn_daily_backs_up_at_startup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let dir = std::env::temp_dir().join(format!("pharma-backup-sched-{}", std::process::id()));
        let dir = dir.to_string_lossy().to_string();

        spawn_daily(db, dir.clone());

        // The first interval tick fires immediately; poll until the file
        // shows up.
        let mut found = false;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if let Ok(mut entries) = tokio::fs::read_dir(&dir).await {
                if entries.next_entry().await.ok().flatten().is_some() {
                    found = true;
                    break;
                }
            }
        }

        tokio::fs::remove_dir_all(&dir).await.ok();
        assert!(found, "scheduled backup did not write a file");
    }
}
