use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryRequestDto, CategoryResponseDto};
use crate::features::categories::models::{Category, CategoryWithCount};
use crate::shared::constants::FALLBACK_CATEGORY_SLUG;
use crate::shared::slug::{slugify, unique_slug};

const NAME_TAKEN: &str = "The name has already been taken.";

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories with their live product counts, ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.slug, c.created_at, c.updated_at,
                   COUNT(p.id) AS products_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id AND p.deleted_at IS NULL
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, created_at, updated_at FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by slug: {:?}", e);
            AppError::Database(e)
        })?;

        category.ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    pub async fn create(&self, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        let name = dto.name.trim().to_string();
        self.ensure_name_free(&name, None).await?;
        let slug = self.free_slug(&name, None).await?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, slug)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&name)
        .bind(&slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {:?}", e);
            AppError::from_db(e, NAME_TAKEN)
        })?;

        tracing::info!("Created category {} ({})", category.slug, category.id);
        Ok(with_count(category, 0))
    }

    /// Rename a category; the slug follows the name only when the name changed
    pub async fn update(&self, slug: &str, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        let current = self.get_by_slug(slug).await?;
        let name = dto.name.trim().to_string();

        let new_slug = if name != current.name {
            self.ensure_name_free(&name, Some(current.id)).await?;
            self.free_slug(&name, Some(current.id)).await?
        } else {
            current.slug.clone()
        };

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, slug = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(current.id)
        .bind(&name)
        .bind(&new_slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category: {:?}", e);
            AppError::from_db(e, NAME_TAKEN)
        })?;

        let products_count = self.products_count(category.id).await?;

        tracing::info!("Updated category {} ({})", category.slug, category.id);
        Ok(with_count(category, products_count))
    }

    /// Delete a category that has no products
    pub async fn delete(&self, slug: &str) -> Result<()> {
        let category = self.get_by_slug(slug).await?;

        let has_products = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1)",
        )
        .bind(category.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check category products: {:?}", e);
            AppError::Database(e)
        })?;

        if has_products {
            return Err(AppError::Conflict(
                "Cannot delete category with existing products.".to_string(),
            ));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::from_db(e, "Cannot delete category with existing products.")
            })?;

        tracing::info!("Deleted category {} ({})", category.slug, category.id);
        Ok(())
    }

    async fn products_count(&self, category_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE category_id = $1 AND deleted_at IS NULL",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count category products: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> Result<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE LOWER(name) = LOWER($1) AND id IS DISTINCT FROM $2)",
        )
        .bind(name)
        .bind(except)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check category name: {:?}", e);
            AppError::Database(e)
        })?;

        if taken {
            return Err(AppError::field("name", NAME_TAKEN));
        }
        Ok(())
    }

    async fn free_slug(&self, name: &str, except: Option<Uuid>) -> Result<String> {
        let pool = &self.pool;
        unique_slug(&slugify(name), FALLBACK_CATEGORY_SLUG, |candidate| async move {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(candidate)
            .bind(except)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check category slug: {:?}", e);
                AppError::Database(e)
            })
        })
        .await
    }
}

fn with_count(category: Category, products_count: i64) -> CategoryResponseDto {
    CategoryResponseDto {
        id: category.id,
        name: category.name,
        slug: category.slug,
        products_count,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::products::services::ProductService;
    use crate::shared::test_helpers::{product_input, scratch_storage, seed_category};

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_delete_refuses_category_with_products(pool: PgPool) {
        let (_dir, storage) = scratch_storage();
        let products = ProductService::new(pool.clone(), storage);
        let categories = CategoryService::new(pool.clone());

        let category = seed_category(&pool, "Lukisan").await;
        products
            .create(product_input(category.id, "Senja di Kuta", 2_500_000))
            .await
            .unwrap();

        let err = categories.delete(&category.slug).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Conflict(ref message) if message == "Cannot delete category with existing products."
        ));
        assert!(categories.get_by_slug(&category.slug).await.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_delete_removes_empty_category(pool: PgPool) {
        let categories = CategoryService::new(pool.clone());
        let category = seed_category(&pool, "Patung").await;

        categories.delete(&category.slug).await.unwrap();

        assert!(matches!(
            categories.get_by_slug(&category.slug).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_names_are_unique_ignoring_case(pool: PgPool) {
        let categories = CategoryService::new(pool.clone());
        seed_category(&pool, "Lukisan Minyak").await;

        let err = categories
            .create(CategoryRequestDto {
                name: "lukisan minyak".to_string(),
            })
            .await
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["name: The name has already been taken.".to_string()]);
    }
}
