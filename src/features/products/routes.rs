use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::features::categories::CategoryService;
use crate::features::products::handlers::{self, AdminProductState, CatalogState};
use crate::features::products::services::{ImageService, ProductService};
use crate::shared::constants::{MAX_IMAGES_PER_UPLOAD, MAX_IMAGE_SIZE};

/// Public catalog routes
pub fn public_routes(
    product_service: Arc<ProductService>,
    category_service: Arc<CategoryService>,
) -> Router {
    let state = CatalogState {
        product_service,
        category_service,
    };

    Router::new()
        .route("/api/catalog", get(handlers::list_catalog))
        .route("/api/catalog/{slug}", get(handlers::get_catalog_product))
        .with_state(state)
}

/// Product management routes, nested under `/api/admin`
pub fn admin_routes(
    product_service: Arc<ProductService>,
    image_service: Arc<ImageService>,
    category_service: Arc<CategoryService>,
) -> Router {
    let state = AdminProductState {
        product_service,
        image_service,
        category_service,
    };

    Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{slug}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/products/{slug}/images",
            // Oversized files must reach the per-file check, so allow a full batch plus multipart overhead
            post(handlers::upload_images).layer(DefaultBodyLimit::max(
                MAX_IMAGE_SIZE * MAX_IMAGES_PER_UPLOAD + 1024 * 1024,
            )),
        )
        .route(
            "/products/{slug}/images/{image_id}",
            delete(handlers::delete_image),
        )
        .with_state(state)
}
