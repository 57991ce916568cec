//! # Report Repository
//!
//! Read-only aggregates for the dashboard and the monthly report.
//!
//! Timestamps are stored as UTC text, so day and month grouping uses
//! string prefixes (`YYYY-MM-DD` / `YYYY-MM`) computed by the caller
//! rather than SQLite's date functions. That keeps grouping independent
//! of the exact timestamp formatting.

use chrono::{Datelike, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;
use pharma_core::SaleSummary;

/// Days ahead within which a product counts as "expiring" on the
/// dashboard tile.
const DASHBOARD_EXPIRY_DAYS: i64 = 30;

/// Headline numbers and charts for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_products: i64,
    pub low_stock_count: i64,
    /// Products expiring within the next 30 days (not yet expired).
    pub expiring_count: i64,
    pub today_sales_count: i64,
    pub today_revenue_cents: i64,
    pub total_sales_count: i64,
    pub total_revenue_cents: i64,
    pub unread_notifications: i64,
    /// Best sellers of the last 30 days.
    pub top_products: Vec<TopProductRow>,
    /// Per-day totals for the last 7 days.
    pub sales_by_day: Vec<DailySalesRow>,
    /// Today's latest sales.
    pub recent_sales: Vec<SaleSummary>,
}

/// One day of the monthly report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySalesRow {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub sales_count: i64,
    pub revenue_cents: i64,
}

/// One product line of a top-sellers table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopProductRow {
    pub product_id: i64,
    pub product_name: Option<String>,
    pub units_sold: i64,
    pub revenue_cents: i64,
    /// Distinct sales the product appeared in.
    pub orders_count: i64,
}

/// One repeat customer, grouped by the free-text customer name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerRow {
    pub customer_name: String,
    pub order_count: i64,
    pub total_spent_cents: i64,
}

/// Aggregated report for one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    /// `YYYY-MM`.
    pub month: String,
    pub sales_count: i64,
    pub revenue_cents: i64,
    /// `revenue_cents / sales_count`, zero for an empty month.
    pub average_order_cents: i64,
    pub daily: Vec<DailySalesRow>,
    pub top_products: Vec<TopProductRow>,
    pub frequent_customers: Vec<CustomerRow>,
}

/// Repository for reporting queries. Never writes.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Computes the dashboard headline numbers and charts.
    pub async fn dashboard(&self) -> DbResult<DashboardStats> {
        let now = Utc::now();
        let today_date = now.date_naive();
        let today = today_date.to_string();

        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let low_stock_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock <= min_stock")
                .fetch_one(&self.pool)
                .await?;

        let expiring_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE expiry_date IS NOT NULL
              AND expiry_date >= ?1
              AND expiry_date <= ?2
            "#,
        )
        .bind(today_date)
        .bind(today_date + Duration::days(DASHBOARD_EXPIRY_DAYS))
        .fetch_one(&self.pool)
        .await?;

        let (today_sales_count, today_revenue_cents): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_cents), 0)
            FROM sales
            WHERE substr(created_at, 1, 10) = ?1
            "#,
        )
        .bind(&today)
        .fetch_one(&self.pool)
        .await?;

        let (total_sales_count, total_revenue_cents): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(total_cents), 0) FROM sales")
                .fetch_one(&self.pool)
                .await?;

        let unread_notifications: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE is_read = 0")
                .fetch_one(&self.pool)
                .await?;

        let month_ago = (today_date - Duration::days(30)).to_string();
        let top_products = sqlx::query_as::<_, TopProductRow>(
            r#"
            SELECT i.product_id,
                   p.name AS product_name,
                   SUM(i.quantity) AS units_sold,
                   SUM(i.quantity * i.unit_price_cents) AS revenue_cents,
                   COUNT(DISTINCT s.id) AS orders_count
            FROM sale_items i
            JOIN sales s ON s.id = i.sale_id
            LEFT JOIN products p ON p.id = i.product_id
            WHERE substr(s.created_at, 1, 10) >= ?1
            GROUP BY i.product_id
            ORDER BY units_sold DESC
            LIMIT 5
            "#,
        )
        .bind(&month_ago)
        .fetch_all(&self.pool)
        .await?;

        let week_ago = (today_date - Duration::days(7)).to_string();
        let sales_by_day = sqlx::query_as::<_, DailySalesRow>(
            r#"
            SELECT substr(created_at, 1, 10) AS day,
                   COUNT(*) AS sales_count,
                   COALESCE(SUM(total_cents), 0) AS revenue_cents
            FROM sales
            WHERE substr(created_at, 1, 10) >= ?1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(&week_ago)
        .fetch_all(&self.pool)
        .await?;

        let recent_sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT s.id, s.customer_name, s.user_id, s.total_cents,
                   s.amount_tendered_cents, s.change_cents, s.payment_method, s.created_at,
                   u.name AS user_name
            FROM sales s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE substr(s.created_at, 1, 10) = ?1
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT 10
            "#,
        )
        .bind(&today)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_products,
            low_stock_count,
            expiring_count,
            today_sales_count,
            today_revenue_cents,
            total_sales_count,
            total_revenue_cents,
            unread_notifications,
            top_products,
            sales_by_day,
            recent_sales,
        })
    }

    /// Builds the report for one calendar month.
    ///
    /// `year`/`month` are validated by the route layer; an out-of-range
    /// month simply yields an empty report.
    pub async fn monthly(&self, year: i32, month: u32) -> DbResult<MonthlyReport> {
        let prefix = format!("{year:04}-{month:02}");

        let (sales_count, revenue_cents): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_cents), 0)
            FROM sales
            WHERE substr(created_at, 1, 7) = ?1
            "#,
        )
        .bind(&prefix)
        .fetch_one(&self.pool)
        .await?;

        let daily = sqlx::query_as::<_, DailySalesRow>(
            r#"
            SELECT substr(created_at, 1, 10) AS day,
                   COUNT(*) AS sales_count,
                   COALESCE(SUM(total_cents), 0) AS revenue_cents
            FROM sales
            WHERE substr(created_at, 1, 7) = ?1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await?;

        let top_products = sqlx::query_as::<_, TopProductRow>(
            r#"
            SELECT i.product_id,
                   p.name AS product_name,
                   SUM(i.quantity) AS units_sold,
                   SUM(i.quantity * i.unit_price_cents) AS revenue_cents,
                   COUNT(DISTINCT s.id) AS orders_count
            FROM sale_items i
            JOIN sales s ON s.id = i.sale_id
            LEFT JOIN products p ON p.id = i.product_id
            WHERE substr(s.created_at, 1, 7) = ?1
            GROUP BY i.product_id
            ORDER BY units_sold DESC
            LIMIT 10
            "#,
        )
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await?;

        let frequent_customers = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT customer_name,
                   COUNT(*) AS order_count,
                   COALESCE(SUM(total_cents), 0) AS total_spent_cents
            FROM sales
            WHERE customer_name IS NOT NULL
              AND customer_name != ''
              AND substr(created_at, 1, 7) = ?1
            GROUP BY customer_name
            ORDER BY order_count DESC
            LIMIT 10
            "#,
        )
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await?;

        let average_order_cents = if sales_count > 0 {
            revenue_cents / sales_count
        } else {
            0
        };

        Ok(MonthlyReport {
            month: prefix,
            sales_count,
            revenue_cents,
            average_order_cents,
            daily,
            top_products,
            frequent_customers,
        })
    }

    /// Report for the current month.
    pub async fn current_month(&self) -> DbResult<MonthlyReport> {
        let now = Utc::now();
        self.monthly(now.year(), now.month()).await
    }
}
