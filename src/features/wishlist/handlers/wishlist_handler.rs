use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::products::dtos::ProductListItemDto;
use crate::features::wishlist::dtos::WishlistToggleDto;
use crate::features::wishlist::services::WishlistService;
use crate::shared::types::{ApiResponse, Meta};

#[utoipa::path(
    get,
    path = "/api/wishlist",
    responses(
        (status = 200, description = "Wishlisted products, most recently added first", body = ApiResponse<Vec<ProductListItemDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "wishlist",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_wishlist(
    user: AuthenticatedUser,
    State(service): State<Arc<WishlistService>>,
) -> Result<Json<ApiResponse<Vec<ProductListItemDto>>>> {
    let products = service.list(user.user_id).await?;
    let total = products.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(products),
        None,
        Some(Meta::total(total)),
    )))
}

/// Add the product to the wishlist, or remove it if already there
#[utoipa::path(
    post,
    path = "/api/wishlist/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Wishlist toggled", body = ApiResponse<WishlistToggleDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    tag = "wishlist",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_wishlist(
    user: AuthenticatedUser,
    State(service): State<Arc<WishlistService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<WishlistToggleDto>>> {
    let result = service.toggle(user.user_id, &slug).await?;
    let message = result.message().to_string();
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product is not on the wishlist", body = ApiResponse<WishlistToggleDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    tag = "wishlist",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_from_wishlist(
    user: AuthenticatedUser,
    State(service): State<Arc<WishlistService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<WishlistToggleDto>>> {
    let result = service.remove(user.user_id, &slug).await?;
    let message = result.message().to_string();
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}
