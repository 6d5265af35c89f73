use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of adding or removing a wishlist entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WishlistToggleDto {
    pub product_slug: String,
    /// Whether the product is on the wishlist after the request
    pub wishlisted: bool,
}

impl WishlistToggleDto {
    pub fn message(&self) -> &'static str {
        if self.wishlisted {
            "Product added to wishlist."
        } else {
            "Product removed from wishlist."
        }
    }
}
