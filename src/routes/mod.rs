use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod storefront;

// Build the routers without binding state; it will be provided at the top level.
pub fn create_storefront_router() -> Router<AppState> {
    Router::new()
        .merge(storefront::router())
        .merge(cart::router())
}

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
}
