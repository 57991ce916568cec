//! Service layer: orchestration between HTTP handlers and pharma-db.
//!
//! Handlers stay thin; anything that combines validation, core math and
//! repository calls lives here.

pub mod alert_service;
pub mod audit;
pub mod backup_service;
pub mod sale_service;
