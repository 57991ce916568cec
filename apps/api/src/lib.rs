//! # PharmaCare API
//!
//! HTTP backend for the pharmacy dashboard.
//!
//! ## Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        API Server                                │
//! │                                                                  │
//! │  Dashboard ──► HTTP (3001) ──► routes ──► services ──► pharma-db │
//! │                                   │                              │
//! │                                   └── JWT auth (AuthUser)        │
//! │                                                                  │
//! │  Background: daily alert scan (low stock + expiry)               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exposed as a library so integration tests can build the router
//! against an in-memory database.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
