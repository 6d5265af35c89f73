use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::home::{dtos as home_dtos, handlers as home_handlers};
use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler, models as users_models};
use crate::features::wishlist::{dtos as wishlist_dtos, handlers::wishlist_handler};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Home
        home_handlers::get_home,
        home_handlers::get_site,
        // Catalog
        products_handlers::list_catalog,
        products_handlers::get_catalog_product,
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Profile
        profile_handler::get_profile,
        profile_handler::update_profile,
        profile_handler::change_password,
        // Wishlist
        wishlist_handler::list_wishlist,
        wishlist_handler::toggle_wishlist,
        wishlist_handler::remove_from_wishlist,
        // Admin
        admin_handlers::get_dashboard,
        admin_handlers::list_users,
        admin_handlers::get_user,
        products_handlers::list_products,
        products_handlers::create_product,
        products_handlers::get_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        products_handlers::upload_images,
        products_handlers::delete_image,
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::UserResponseDto,
            users_dtos::UpdateProfileDto,
            users_dtos::ChangePasswordDto,
            ApiResponse<users_dtos::UserResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategorySummaryDto,
            categories_dtos::CategoryRequestDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Products
            products_models::ProductType,
            products_models::ProductStatus,
            products_dtos::SortOption,
            products_dtos::ProductListItemDto,
            products_dtos::ProductDetailDto,
            products_dtos::ImageDto,
            products_dtos::PrintSizeDto,
            products_dtos::PrintSizeInput,
            products_dtos::ProductRequestDto,
            products_dtos::CatalogFiltersDto,
            products_dtos::CatalogPageDto,
            products_dtos::ProductPageDto,
            products_dtos::AdminProductFiltersDto,
            products_dtos::AdminProductListDto,
            products_dtos::AdminProductEditDto,
            products_dtos::UploadImagesDto,
            products_dtos::ImageUploadResponseDto,
            ApiResponse<products_dtos::CatalogPageDto>,
            ApiResponse<products_dtos::ProductPageDto>,
            ApiResponse<products_dtos::ProductDetailDto>,
            ApiResponse<products_dtos::AdminProductListDto>,
            ApiResponse<products_dtos::AdminProductEditDto>,
            ApiResponse<products_dtos::ImageUploadResponseDto>,
            // Home
            home_dtos::HomePageDto,
            home_dtos::SiteInfoDto,
            ApiResponse<home_dtos::HomePageDto>,
            ApiResponse<home_dtos::SiteInfoDto>,
            // Wishlist
            wishlist_dtos::WishlistToggleDto,
            ApiResponse<wishlist_dtos::WishlistToggleDto>,
            ApiResponse<Vec<products_dtos::ProductListItemDto>>,
            // Admin
            admin_dtos::DashboardStatsDto,
            admin_dtos::AdminUserFiltersDto,
            admin_dtos::AdminUserListDto,
            admin_dtos::AdminUserDetailDto,
            ApiResponse<admin_dtos::DashboardStatsDto>,
            ApiResponse<admin_dtos::AdminUserListDto>,
            ApiResponse<admin_dtos::AdminUserDetailDto>,
        )
    ),
    tags(
        (name = "home", description = "Home page and storefront settings (public)"),
        (name = "catalog", description = "Product catalog (public)"),
        (name = "auth", description = "Registration, login and current user"),
        (name = "profile", description = "Self-service profile management"),
        (name = "wishlist", description = "Per-user wishlist"),
        (name = "admin", description = "Dashboard and customers (admin only)"),
        (name = "admin-products", description = "Product and image management (admin only)"),
        (name = "admin-categories", description = "Category management (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Galeri API",
        version = "0.1.0",
        description = "API documentation for the Galeri art storefront",
    )
)]
pub struct ApiDoc;

/// Registers the bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_lists_storefront_and_admin_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/catalog",
            "/api/catalog/{slug}",
            "/api/wishlist/{slug}",
            "/api/admin/products/{slug}/images/{image_id}",
            "/api/admin/categories/{slug}",
            "/api/admin/users/{id}",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
