use axum::{Router, routing::get};

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod promotions;
pub mod upload;
pub mod wishlist;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/auth", auth::router())
        .nest("/orders", orders::route())
        .nest("/admin", admin::router())
        .nest("/wishlist", wishlist::router())
        .route("/promotions", get(promotions::promotion_banner))
}
