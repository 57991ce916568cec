//! Shared application state.

use pharma_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::services::sale_service::SaleService;

/// State shared by every handler. Cloning is cheap; the database pool
/// and JWT manager are both internally reference-counted or small.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
    pub sales: SaleService,
}

impl AppState {
    /// Assembles the state from loaded configuration and a connected
    /// database.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
        let sales = SaleService::new(db.clone(), config.reject_underpayment);

        AppState {
            db,
            config,
            jwt,
            sales,
        }
    }
}
