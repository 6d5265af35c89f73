use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use sqlx::PgPool;

use crate::core::config::{AuthConfig, Config, SiteConfig};
use crate::core::middleware;
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::auth::{routes as auth_routes, AuthService, JwtManager};
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::home::routes as home_routes;
use crate::features::products::{routes as products_routes, ImageService, ProductService};
use crate::features::users::{routes as users_routes, UserService};
use crate::features::wishlist::{routes as wishlist_routes, WishlistService};
use crate::modules::storage::ImageStorage;

/// Every service the HTTP layer needs, wired to one pool and one storage driver
#[derive(Clone)]
pub struct AppServices {
    pub jwt: Arc<JwtManager>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub category_service: Arc<CategoryService>,
    pub product_service: Arc<ProductService>,
    pub image_service: Arc<ImageService>,
    pub wishlist_service: Arc<WishlistService>,
    pub admin_service: Arc<AdminService>,
}

impl AppServices {
    pub fn new(pool: PgPool, storage: Arc<dyn ImageStorage>, auth: &AuthConfig) -> Self {
        let jwt = Arc::new(JwtManager::new(auth));
        tracing::info!("JWT manager initialized (issuer: {})", auth.issuer);

        let user_service = Arc::new(UserService::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_service),
            Arc::clone(&jwt),
        ));
        tracing::info!("Auth and user services initialized");

        let category_service = Arc::new(CategoryService::new(pool.clone()));
        tracing::info!("Category service initialized");

        let product_service = Arc::new(ProductService::new(pool.clone(), Arc::clone(&storage)));
        let image_service = Arc::new(ImageService::new(pool.clone(), Arc::clone(&storage)));
        tracing::info!(
            "Product services initialized ({} image storage)",
            storage.driver_name()
        );

        let wishlist_service = Arc::new(WishlistService::new(
            pool.clone(),
            Arc::clone(&product_service),
        ));
        tracing::info!("Wishlist service initialized");

        let admin_service = Arc::new(AdminService::new(
            pool,
            Arc::clone(&user_service),
            Arc::clone(&product_service),
        ));
        tracing::info!("Admin service initialized");

        Self {
            jwt,
            user_service,
            auth_service,
            category_service,
            product_service,
            image_service,
            wishlist_service,
            admin_service,
        }
    }
}

/// All `/api` routes with their auth gates.
///
/// Public routes need no token. Protected routes require a valid bearer
/// token. Routes under `/api/admin` additionally require the admin role.
pub fn api_router(services: &AppServices, site: &SiteConfig, max_body_size: usize) -> Router {
    let admin = Router::new()
        .merge(admin_routes::routes(Arc::clone(&services.admin_service)))
        .merge(products_routes::admin_routes(
            Arc::clone(&services.product_service),
            Arc::clone(&services.image_service),
            Arc::clone(&services.category_service),
        ))
        .merge(categories_routes::admin_routes(Arc::clone(
            &services.category_service,
        )))
        .route_layer(from_fn(middleware::require_admin));

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(
            &services.auth_service,
        )))
        .merge(users_routes::routes(Arc::clone(&services.user_service)))
        .merge(wishlist_routes::routes(Arc::clone(
            &services.wishlist_service,
        )))
        .nest("/api/admin", admin)
        .route_layer(from_fn_with_state(
            Arc::clone(&services.jwt),
            middleware::auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth_service)))
        .merge(home_routes::routes(Arc::clone(&services.product_service), site))
        .merge(products_routes::public_routes(
            Arc::clone(&services.product_service),
            Arc::clone(&services.category_service),
        ));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(DefaultBodyLimit::max(max_body_size))
}

/// `api_router` configured from the full application config
pub fn from_config(services: &AppServices, config: &Config) -> Router {
    api_router(services, &config.site, config.app.max_request_body_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{bearer, test_app, test_user};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_guest_is_rejected_from_protected_routes() {
        let (server, _) = test_app();

        for path in ["/api/auth/me", "/api/profile", "/api/wishlist"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
        }

        let response = server.post("/api/wishlist/senja-di-kuta").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guest_is_rejected_from_admin_routes() {
        let (server, _) = test_app();

        let response = server.get("/api/admin/dashboard").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Lukisan" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let (server, _) = test_app();

        let response = server
            .get("/api/profile")
            .add_header("Authorization", "Bearer not-a-token")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_customer_is_forbidden_from_admin_routes() {
        let (server, services) = test_app();
        let token = bearer(&services, &test_user(UserRole::User));

        for path in ["/api/admin/dashboard", "/api/admin/products", "/api/admin/users"] {
            let response = server.get(path).add_header("Authorization", &token).await;
            response.assert_status(StatusCode::FORBIDDEN);
            let body: Value = response.json();
            assert_eq!(body["message"], json!("Unauthorized access"));
        }

        let response = server
            .delete("/api/admin/categories/lukisan")
            .add_header("Authorization", &token)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_product_form_is_validated_before_storage() {
        let (server, services) = test_app();
        let token = bearer(&services, &test_user(UserRole::Admin));

        let response = server
            .post("/api/admin/products")
            .add_header("Authorization", &token)
            .json(&json!({ "title": "", "width": 0 }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
        assert!(errors.contains(&"category_id: Please select a category.".to_string()));
        assert!(errors.contains(&"title: Product title is required.".to_string()));
        assert!(errors.iter().any(|e| e.starts_with("width:")));
    }

    #[tokio::test]
    async fn test_admin_category_name_is_validated() {
        let (server, services) = test_app();
        let token = bearer(&services, &test_user(UserRole::Admin));

        let response = server
            .post("/api/admin/categories")
            .add_header("Authorization", &token)
            .json(&json!({ "name": "   " }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let (server, _) = test_app();

        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "name": "Rani",
                "email": "not-an-email",
                "password": "short",
                "password_confirmation": "different"
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
        assert!(errors.iter().any(|e| e.starts_with("email:")));
        assert!(errors.iter().any(|e| e.starts_with("password:")));
        assert!(errors.iter().any(|e| e.starts_with("password_confirmation:")));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (server, services) = test_app();
        let token = bearer(&services, &test_user(UserRole::Admin));

        let response = server
            .post("/api/admin/categories")
            .add_header("Authorization", &token)
            .content_type("application/json")
            .bytes("{not json".into())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_catalog_filter_is_bad_request() {
        let (server, _) = test_app();

        let response = server.get("/api/catalog?type=poster").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_site_settings_need_no_database() {
        let (server, _) = test_app();

        let response = server.get("/api/site").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["name"], json!("Galeri Test"));
        assert_eq!(body["data"]["currencies"], json!(["IDR", "USD"]));
    }
}
