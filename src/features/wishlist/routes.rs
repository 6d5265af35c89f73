use crate::features::wishlist::handlers::wishlist_handler;
use crate::features::wishlist::services::WishlistService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Wishlist routes; mounted behind the auth middleware
pub fn routes(service: Arc<WishlistService>) -> Router {
    Router::new()
        .route("/api/wishlist", get(wishlist_handler::list_wishlist))
        .route(
            "/api/wishlist/{slug}",
            post(wishlist_handler::toggle_wishlist).delete(wishlist_handler::remove_from_wishlist),
        )
        .with_state(service)
}
