//! Inventory alert scan.
//!
//! Walks the catalog for low stock and approaching expiry dates and
//! raises dashboard notifications. Runs once at startup and then every
//! 24 hours from a background task.
//!
//! Each finding is deduplicated against the last 24 hours by message
//! text, so a product that stays low does not spam a new notification on
//! every run.

use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tracing::{error, info, warn};

use pharma_core::{NewNotification, NotificationKind};
use pharma_db::Database;

use crate::error::ApiError;

const DEDUPE_WINDOW_HOURS: i64 = 24;

/// What one scan produced, for logging and the manual trigger endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanOutcome {
    pub low_stock_alerts: usize,
    pub expiry_alerts: usize,
    pub skipped_duplicates: usize,
}

/// Runs one alert scan.
pub async fn scan(db: &Database, expiry_warning_days: i64) -> Result<ScanOutcome, ApiError> {
    let now = Utc::now();
    let dedupe_since = now - ChronoDuration::hours(DEDUPE_WINDOW_HOURS);

    let mut outcome = ScanOutcome {
        low_stock_alerts: 0,
        expiry_alerts: 0,
        skipped_duplicates: 0,
    };

    for product in db.products().low_stock().await? {
        let message = format!(
            "Low stock: {} ({} left, threshold {})",
            product.name, product.stock, product.min_stock
        );

        if db.notifications().exists_since(&message, dedupe_since).await? {
            outcome.skipped_duplicates += 1;
            continue;
        }

        db.notifications()
            .create(&NewNotification {
                kind: NotificationKind::Warning,
                title: "Low stock".to_string(),
                message,
                user_id: None,
            })
            .await?;
        outcome.low_stock_alerts += 1;
    }

    let cutoff = now.date_naive() + ChronoDuration::days(expiry_warning_days);
    for product in db.products().expiring_before(cutoff).await? {
        let Some(expiry) = product.expiry_date else {
            continue;
        };

        let days_left = (expiry - now.date_naive()).num_days();
        let (kind, message) = if days_left < 0 {
            (
                NotificationKind::Error,
                format!("{} expired on {}", product.name, expiry),
            )
        } else {
            (
                NotificationKind::Warning,
                format!("{} expires in {} days ({})", product.name, days_left, expiry),
            )
        };

        if db.notifications().exists_since(&message, dedupe_since).await? {
            outcome.skipped_duplicates += 1;
            continue;
        }

        db.notifications()
            .create(&NewNotification {
                kind,
                title: "Expiry warning".to_string(),
                message,
                user_id: None,
            })
            .await?;
        outcome.expiry_alerts += 1;
    }

    info!(
        low_stock = outcome.low_stock_alerts,
        expiry = outcome.expiry_alerts,
        skipped = outcome.skipped_duplicates,
        "Alert scan complete"
    );

    Ok(outcome)
}

/// Spawns the daily scan loop. The task runs for the lifetime of the
/// process; a failed scan is logged and retried on the next tick.
pub fn spawn_daily(db: Database, expiry_warning_days: i64) {
    if expiry_warning_days <= 0 {
        warn!(expiry_warning_days, "Expiry warning window is not positive");
    }

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(24 * 60 * 60));

        loop {
            // First tick fires immediately, giving a scan at startup.
            interval.tick().await;

            match scan(&db, expiry_warning_days).await {
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "Alert scan failed");
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pharma_core::NewProduct;
    use pharma_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(name: &str, stock: i64, min_stock: i64, expiry: Option<NaiveDate>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category_id: None,
            purchase_price_cents: 0,
            price_cents: 500,
            stock,
            min_stock,
            supplier_id: None,
            expiry_date: expiry,
            batch_number: None,
        }
    }

    #[tokio::test]
    async fn test_scan_raises_low_stock_alert() {
        let db = test_db().await;
        db.products()
            .create(&product("Paracetamol 500mg", 3, 20, None))
            .await
            .unwrap();
        db.products()
            .create(&product("Well stocked", 100, 20, None))
            .await
            .unwrap();

        let outcome = scan(&db, 30).await.unwrap();
        assert_eq!(outcome.low_stock_alerts, 1);
        assert_eq!(outcome.expiry_alerts, 0);

        let notifications = db.notifications().list(10).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].message.contains("Paracetamol"));
    }

    #[tokio::test]
    async fn test_scan_deduplicates_within_window() {
        let db = test_db().await;
        db.products()
            .create(&product("Aspirin", 1, 10, None))
            .await
            .unwrap();

        let first = scan(&db, 30).await.unwrap();
        assert_eq!(first.low_stock_alerts, 1);

        let second = scan(&db, 30).await.unwrap();
        assert_eq!(second.low_stock_alerts, 0);
        assert_eq!(second.skipped_duplicates, 1);

        assert_eq!(db.notifications().list(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_flags_expiring_and_expired() {
        let db = test_db().await;
        let today = Utc::now().date_naive();

        db.products()
            .create(&product(
                "Expiring soon",
                50,
                5,
                Some(today + ChronoDuration::days(10)),
            ))
            .await
            .unwrap();
        db.products()
            .create(&product(
                "Already expired",
                50,
                5,
                Some(today - ChronoDuration::days(3)),
            ))
            .await
            .unwrap();
        db.products()
            .create(&product(
                "Fine for a year",
                50,
                5,
                Some(today + ChronoDuration::days(365)),
            ))
            .await
            .unwrap();

        let outcome = scan(&db, 30).await.unwrap();
        assert_eq!(outcome.expiry_alerts, 2);

        let notifications = db.notifications().list(10).await.unwrap();
        let expired = notifications
            .iter()
            .find(|n| n.message.contains("expired on"))
            .unwrap();
        assert_eq!(expired.kind, NotificationKind::Error);
    }
}
