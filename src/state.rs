use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    services::discount_service::DiscountRegistry,
    storage::Storage,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub storage: Storage,
    pub discounts: DiscountRegistry,
    pub config: Arc<AppConfig>,
}
