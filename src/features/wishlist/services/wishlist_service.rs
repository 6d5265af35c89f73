use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::ProductListItemDto;
use crate::features::products::services::{ListingOrder, ProductFilter, ProductService};
use crate::features::wishlist::dtos::WishlistToggleDto;

/// Service for a user's wishlist
pub struct WishlistService {
    pool: PgPool,
    products: Arc<ProductService>,
}

impl WishlistService {
    pub fn new(pool: PgPool, products: Arc<ProductService>) -> Self {
        Self { pool, products }
    }

    /// Wishlisted products, most recently added first
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ProductListItemDto>> {
        let filter = ProductFilter {
            wishlisted_by: Some(user_id),
            ..Default::default()
        };
        self.products
            .list_all(&filter, ListingOrder::WishlistedAt)
            .await
    }

    /// Remove the product if it is wishlisted, add it otherwise
    pub async fn toggle(&self, user_id: Uuid, slug: &str) -> Result<WishlistToggleDto> {
        let product = self.products.find_by_slug(slug).await?;

        let removed = self.detach(user_id, product.id).await?;
        if !removed {
            sqlx::query(
                r#"
                INSERT INTO wishlists (user_id, product_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, product_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(product.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to add wishlist entry: {:?}", e);
                AppError::Database(e)
            })?;
        }

        tracing::info!(
            "User {} {} product {} on wishlist",
            user_id,
            if removed { "removed" } else { "added" },
            product.slug
        );

        Ok(WishlistToggleDto {
            product_slug: product.slug,
            wishlisted: !removed,
        })
    }

    /// Remove the product from the wishlist; absent entries are fine
    pub async fn remove(&self, user_id: Uuid, slug: &str) -> Result<WishlistToggleDto> {
        let product = self.products.find_by_slug(slug).await?;
        let removed = self.detach(user_id, product.id).await?;

        if removed {
            tracing::info!("User {} removed product {} from wishlist", user_id, product.slug);
        }

        Ok(WishlistToggleDto {
            product_slug: product.slug,
            wishlisted: false,
        })
    }

    async fn detach(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove wishlist entry: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
