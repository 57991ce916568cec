//! HTTP route handlers.
//!
//! One module per resource; [`build_router`] assembles them into the
//! application router. Every handler except health and login requires a
//! bearer token via the [`crate::auth::AuthUser`] extractor.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod activity;
pub mod auth;
pub mod backup;
pub mod categories;
pub mod health;
pub mod notifications;
pub mod products;
pub mod reports;
pub mod sales;
pub mod settings;
pub mod suppliers;
pub mod users;

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::check))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route(
            "/api/suppliers",
            get(suppliers::list).post(suppliers::create),
        )
        .route(
            "/api/suppliers/{id}",
            get(suppliers::get)
                .put(suppliers::update)
                .delete(suppliers::delete),
        )
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/sales", get(sales::list).post(sales::create))
        .route("/api/sales/history/{date}", get(sales::history))
        .route("/api/sales/{id}", get(sales::get))
        .route("/api/sales/{id}/invoice", get(sales::invoice))
        .route("/api/notifications", get(notifications::list))
        .route(
            "/api/notifications/read-all",
            put(notifications::mark_all_read),
        )
        .route(
            "/api/notifications/{id}/read",
            put(notifications::mark_read),
        )
        .route(
            "/api/notifications/{id}",
            axum::routing::delete(notifications::delete),
        )
        .route("/api/settings", get(settings::list).put(settings::update_all))
        .route(
            "/api/settings/{key}",
            get(settings::get).put(settings::update),
        )
        .route("/api/activity", get(activity::list))
        .route("/api/reports/dashboard", get(reports::dashboard))
        .route("/api/reports/monthly", get(reports::monthly))
        .route("/api/backup", post(backup::run))
        .route("/api/alerts/scan", post(notifications::trigger_scan))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
