use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{AdminUserDetailDto, DashboardStatsDto};
use crate::features::products::services::listing::escape_like;
use crate::features::products::services::{ListingOrder, ProductFilter, ProductService};
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::User;
use crate::features::users::services::USER_COLUMNS;
use crate::features::users::UserService;
use crate::shared::types::{Meta, Page};

/// Service for back-office queries that span features
pub struct AdminService {
    pool: PgPool,
    users: Arc<UserService>,
    products: Arc<ProductService>,
}

impl AdminService {
    pub fn new(pool: PgPool, users: Arc<UserService>, products: Arc<ProductService>) -> Self {
        Self {
            pool,
            users,
            products,
        }
    }

    // =========================================================================
    // DASHBOARD
    // =========================================================================

    pub async fn dashboard(&self) -> Result<DashboardStatsDto> {
        let (total_products, total_sold, total_users, total_categories) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM products WHERE deleted_at IS NULL),
                    (SELECT COUNT(*) FROM products WHERE deleted_at IS NULL AND status = 'sold'),
                    (SELECT COUNT(*) FROM users WHERE role = 'user'),
                    (SELECT COUNT(*) FROM categories)
                "#,
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load dashboard stats: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(DashboardStatsDto {
            total_products,
            total_sold,
            total_users,
            total_categories,
        })
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// Customer accounts (role `user`), newest first
    pub async fn list_users(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<(Vec<UserResponseDto>, Meta)> {
        let pattern = search.map(|s| format!("%{}%", escape_like(s.trim())));

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE role = 'user'
              AND ($1::TEXT IS NULL OR name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count users: {:?}", e);
            AppError::Database(e)
        })?;

        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {} FROM users
            WHERE role = 'user'
              AND ($1::TEXT IS NULL OR name ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            USER_COLUMNS
        ))
        .bind(&pattern)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((
            users.into_iter().map(UserResponseDto::from).collect(),
            page.meta(total),
        ))
    }

    /// One user with their wishlisted products
    pub async fn get_user(&self, user_id: Uuid) -> Result<AdminUserDetailDto> {
        let user = self.users.get(user_id).await?;

        let filter = ProductFilter {
            wishlisted_by: Some(user.id),
            ..Default::default()
        };
        let wishlist = self
            .products
            .list_all(&filter, ListingOrder::WishlistedAt)
            .await?;

        tracing::debug!("Loaded user {} with {} wishlist item(s)", user.id, wishlist.len());

        Ok(AdminUserDetailDto {
            user: user.into(),
            wishlist,
        })
    }
}
