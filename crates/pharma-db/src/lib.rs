//! # pharma-db: Database Layer for PharmaCare
//!
//! This crate provides database access for the PharmaCare backend.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     PharmaCare Data Flow                         │
//! │                                                                  │
//! │  HTTP handler (POST /api/sales)                                  │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                  pharma-db (THIS CRATE)                    │  │
//! │  │                                                            │  │
//! │  │   ┌─────────────┐   ┌───────────────┐   ┌──────────────┐   │  │
//! │  │   │  Database   │   │  Repositories │   │  Migrations  │   │  │
//! │  │   │  (pool.rs)  │◄──│  (sale.rs &   │   │  (embedded)  │   │  │
//! │  │   │             │   │   friends)    │   │              │   │  │
//! │  │   └─────────────┘   └───────────────┘   └──────────────┘   │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  SQLite database file (./data/pharmacare.db)                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations, one per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharma_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/db.sqlite")).await?;
//!
//! let products = db.products().list().await?;
//! let receipt = db.sales().record_sale(&new_sale).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::activity::ActivityLogRepository;
pub use repository::category::CategoryRepository;
pub use repository::notification::NotificationRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::settings::SettingsRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;
