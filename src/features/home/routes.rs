use std::sync::Arc;

use axum::{routing::get, Router};

use crate::core::config::SiteConfig;
use crate::features::home::dtos::SiteInfoDto;
use crate::features::home::handlers::{self, HomeState};
use crate::features::products::ProductService;

/// Public home and site-settings routes
pub fn routes(product_service: Arc<ProductService>, site: &SiteConfig) -> Router {
    let state = HomeState {
        product_service,
        site: Arc::new(SiteInfoDto::from(site)),
    };

    Router::new()
        .route("/api/home", get(handlers::get_home))
        .route("/api/site", get(handlers::get_site))
        .with_state(state)
}
