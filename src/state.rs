use std::sync::Arc;

use crate::{
    catalog::VariantRegistry,
    db::{DbPool, OrmConn, orm_from_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub catalog: Arc<VariantRegistry>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            orm: orm_from_pool(pool.clone()),
            pool,
            catalog: Arc::new(VariantRegistry::storefront()),
        }
    }
}
