//! # Domain Types
//!
//! Core domain types for the PharmaCare backend.
//!
//! Entities use the SQLite rowid (`i64`) as identity, matching the
//! relational schema. Monetary fields are integer minor units (`_cents`
//! suffix); see [`crate::money`].
//!
//! The `sqlx` feature adds `FromRow`/`Type` derives so pharma-db can map
//! query results straight into these structs without a parallel set of row
//! types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Users
// =============================================================================

/// Role of a user account, gating what the dashboard exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Pharmacist,
    Cashier,
    Seller,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Cashier
    }
}

/// Whether an account (user or supplier) may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

/// A user account (cashier, pharmacist, admin or seller).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    /// Display name shown in the dashboard and on receipts.
    pub name: String,
    /// Login identifier, unique.
    pub username: String,
    pub email: Option<String>,
    /// Argon2 hash; never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// An inactive account cannot log in or record sales.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Payload for creating a user. The password arrives in clear text over the
/// API and is hashed before it reaches pharma-db.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
}

// =============================================================================
// Suppliers & Categories
// =============================================================================

/// A supplier the pharmacy orders stock from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub status: AccountStatus,
}

/// A product category (Analgesic, Antibiotic, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// A product on the pharmacy's shelves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    /// What the pharmacy paid per unit, for margin reports.
    pub purchase_price_cents: i64,
    /// Unit sale price.
    pub price_cents: i64,
    /// Current stock level. Decremented by the sale commit transaction;
    /// the commit path does not clamp this at zero.
    pub stock: i64,
    /// Threshold below which the product shows up in low-stock alerts.
    pub min_stock: i64,
    pub supplier_id: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// True when stock has fallen to or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Days until expiry, negative when already expired. None when the
    /// product carries no expiry date.
    pub fn days_until_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.expiry_date
            .map(|d| (d - today).num_days())
    }
}

/// Product with its category and supplier names joined in, as listed in the
/// inventory screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub purchase_price_cents: i64,
    pub price_cents: i64,
    pub stock: i64,
    pub min_stock: i64,
    pub supplier_id: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub supplier_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub purchase_price_cents: i64,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    pub supplier_id: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
}

// =============================================================================
// Sales
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

/// A recorded sale. Immutable once committed: there is no update or delete
/// path for sales in this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub customer_name: Option<String>,
    /// The cashier who recorded the sale.
    pub user_id: i64,
    /// Server-computed sum of line totals.
    pub total_cents: i64,
    /// Cash handed over, when captured. NULL for card/mobile or deferred.
    pub amount_tendered_cents: Option<i64>,
    /// tendered - total. Stored even when negative (underpayment).
    pub change_cents: Option<i64>,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// Sale joined with the cashier's display name, for the history screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleSummary {
    pub id: i64,
    pub customer_name: Option<String>,
    pub user_id: i64,
    pub total_cents: i64,
    pub amount_tendered_cents: Option<i64>,
    pub change_cents: Option<i64>,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
}

/// One line of a sale.
///
/// `unit_price_cents` is a snapshot taken at commit time; it is never
/// recomputed from the product table afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// Sale line joined with the product name, for receipts and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItemDetail {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub product_name: Option<String>,
}

/// A fully validated sale ready to be committed atomically.
///
/// Built by the sale service after totals and change have been computed;
/// pharma-db persists it verbatim inside one transaction.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer_name: Option<String>,
    pub user_id: i64,
    pub total_cents: i64,
    pub amount_tendered_cents: Option<i64>,
    pub change_cents: Option<i64>,
    pub payment_method: PaymentMethod,
    pub items: Vec<NewSaleItem>,
}

/// One line of a [`NewSale`].
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a notification shown in the dashboard bell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl Default for NotificationKind {
    fn default() -> Self {
        NotificationKind::Info
    }
}

/// An ephemeral alert (low stock, near expiry, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// NULL targets every user.
    pub user_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub user_id: Option<i64>,
}

// =============================================================================
// Activity Log
// =============================================================================

/// An append-only audit record: who did what, for traceability.
///
/// `old_values`/`new_values` hold JSON snapshots serialized as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityLogEntry {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub table_name: Option<String>,
    pub record_id: Option<i64>,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Audit entry joined with the actor's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityLogView {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub table_name: Option<String>,
    pub record_id: Option<i64>,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewActivityEntry {
    pub user_id: i64,
    pub action: String,
    pub table_name: Option<String>,
    pub record_id: Option<i64>,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// =============================================================================
// Settings
// =============================================================================

/// How a setting's text value should be interpreted by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    Number,
    Boolean,
    Json,
}

impl Default for SettingType {
    fn default() -> Self {
        SettingType::String
    }
}

/// A system setting (pharmacy name, currency, alert thresholds, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Setting {
    pub setting_key: String,
    pub setting_value: Option<String>,
    pub setting_type: SettingType,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}
