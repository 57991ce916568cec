//! # pharma-core: Pure Business Logic for PharmaCare
//!
//! This crate is the heart of the PharmaCare point-of-sale backend. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! HTTP handlers (apps/api)
//!        │
//!        ▼
//! ★ pharma-core (THIS CRATE) ★
//!   types · money · checkout · validation
//!   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS
//!        │
//!        ▼
//! pharma-db (SQLite queries, migrations, repositories)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, User, Notification, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - Cart math: totals and change computation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: database, network and file system access are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are minor units (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use checkout::{compute_change, compute_total, CartLine};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale.
///
/// Prevents runaway carts and keeps receipts printable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// Guards against typos (1000 instead of 10) at the till.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Default number of days before expiry at which a product is flagged.
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;
