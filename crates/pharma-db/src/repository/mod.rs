//! # Repository Pattern Implementation
//!
//! One repository per table. Repositories own a pool clone and expose
//! async methods returning [`crate::error::DbResult`].
//!
//! ## Design
//! ```text
//! Service layer (apps/api)
//!       │
//!       ▼
//! Repository (this module)  ← SQL lives here, nowhere else
//!       │
//!       ▼
//! SqlitePool
//! ```
//!
//! Multi-table writes that must be atomic (the sale commit) open a
//! transaction inside the owning repository rather than leaking
//! `sqlx::Transaction` upwards.

pub mod activity;
pub mod category;
pub mod notification;
pub mod product;
pub mod report;
pub mod sale;
pub mod settings;
pub mod supplier;
pub mod user;
