use std::sync::Arc;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategorySummaryDto;
use crate::features::categories::models::Category;
use crate::features::products::dtos::{
    PrintSizeInput, ProductDetailDto, ProductInput, ProductListItemDto, SortOption,
};
use crate::features::products::models::{
    Image, PrintSize, Product, ProductListRow, ProductStatus, ProductType,
};
use crate::features::products::services::listing::{
    count_query, list_query, ListingOrder, ProductFilter,
};
use crate::modules::storage::ImageStorage;
use crate::shared::constants::{FALLBACK_PRODUCT_SLUG, FEATURED_LIMIT, RELATED_LIMIT};
use crate::shared::slug::{slugify, unique_slug};
use crate::shared::types::{Meta, Page};

pub(crate) const PRODUCT_COLUMNS: &str = "id, category_id, title, slug, description, product_type, \
     price, price_usd, width, height, medium, year_created, status, is_featured, created_at, updated_at";

const IMAGE_COLUMNS: &str = "id, product_id, url, is_primary, sort_order, created_at, updated_at";

const PRINT_SIZE_COLUMNS: &str =
    "id, product_id, size_name, width, height, price, price_usd, created_at, updated_at";

const SLUG_TAKEN: &str = "A product with this slug already exists.";

/// Service for products: listings, detail pages and admin CRUD
pub struct ProductService {
    pool: PgPool,
    storage: Arc<dyn ImageStorage>,
}

impl ProductService {
    pub fn new(pool: PgPool, storage: Arc<dyn ImageStorage>) -> Self {
        Self { pool, storage }
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    /// One page of listing rows plus pagination meta
    pub async fn list(
        &self,
        filter: &ProductFilter,
        order: ListingOrder,
        page: Page,
    ) -> Result<(Vec<ProductListItemDto>, Meta)> {
        let total: i64 = count_query(filter)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count products: {:?}", e);
                AppError::Database(e)
            })?;

        let items = self
            .list_window(filter, order, page.size, page.offset())
            .await?;

        Ok((items, page.meta(total)))
    }

    /// Listing rows without a total, for fixed-size strips
    pub async fn list_window(
        &self,
        filter: &ProductFilter,
        order: ListingOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductListItemDto>> {
        self.fetch_listing(filter, order, Some((limit, offset))).await
    }

    /// Every matching listing row, unpaginated
    pub async fn list_all(
        &self,
        filter: &ProductFilter,
        order: ListingOrder,
    ) -> Result<Vec<ProductListItemDto>> {
        self.fetch_listing(filter, order, None).await
    }

    async fn fetch_listing(
        &self,
        filter: &ProductFilter,
        order: ListingOrder,
        window: Option<(i64, i64)>,
    ) -> Result<Vec<ProductListItemDto>> {
        let rows = list_query(filter, order, window)
            .build_query_as::<ProductListRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(ProductListItemDto::from).collect())
    }

    /// Featured, available products, newest first
    pub async fn featured(&self) -> Result<Vec<ProductListItemDto>> {
        let filter = ProductFilter {
            status: Some(ProductStatus::Available),
            featured_only: true,
            ..Default::default()
        };
        self.list_window(
            &filter,
            ListingOrder::Sort(SortOption::Newest),
            FEATURED_LIMIT,
            0,
        )
        .await
    }

    /// Available products from the same category, excluding the product itself
    pub async fn related(&self, product: &ProductDetailDto) -> Result<Vec<ProductListItemDto>> {
        let filter = ProductFilter {
            category_id: Some(product.category.id),
            status: Some(ProductStatus::Available),
            exclude_id: Some(product.id),
            ..Default::default()
        };
        self.list_window(
            &filter,
            ListingOrder::Sort(SortOption::Newest),
            RELATED_LIMIT,
            0,
        )
        .await
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// Live (not soft-deleted) product by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE slug = $1 AND deleted_at IS NULL",
            PRODUCT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product by slug: {:?}", e);
            AppError::Database(e)
        })?;

        product.ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", slug)))
    }

    pub async fn get_detail(&self, slug: &str) -> Result<ProductDetailDto> {
        let product = self.find_by_slug(slug).await?;
        tracing::debug!("Loading detail for product {}", product.id);
        self.load_detail(product).await
    }

    async fn load_detail(&self, product: Product) -> Result<ProductDetailDto> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(product.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product category: {:?}", e);
            AppError::Database(e)
        })?;

        let images = sqlx::query_as::<_, Image>(&format!(
            "SELECT {} FROM images WHERE product_id = $1 ORDER BY sort_order, created_at",
            IMAGE_COLUMNS
        ))
        .bind(product.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product images: {:?}", e);
            AppError::Database(e)
        })?;

        let print_sizes = sqlx::query_as::<_, PrintSize>(&format!(
            "SELECT {} FROM print_sizes WHERE product_id = $1 ORDER BY created_at, id",
            PRINT_SIZE_COLUMNS
        ))
        .bind(product.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product print sizes: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ProductDetailDto::assemble(
            product,
            category.into(),
            images,
            print_sizes,
        ))
    }

    // =========================================================================
    // ADMIN CRUD
    // =========================================================================

    /// Create a product. Print sizes are stored only for print products.
    pub async fn create(&self, input: ProductInput) -> Result<ProductDetailDto> {
        self.ensure_category(input.category_id).await?;
        let slug = self.free_slug(&input.title, None).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                id, category_id, title, slug, description, product_type, price, price_usd,
                width, height, medium, year_created, status, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(input.category_id)
        .bind(&input.title)
        .bind(&slug)
        .bind(&input.description)
        .bind(input.product_type)
        .bind(input.price)
        .bind(input.price_usd)
        .bind(input.width)
        .bind(input.height)
        .bind(&input.medium)
        .bind(input.year_created)
        .bind(input.status)
        .bind(input.is_featured)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create product: {:?}", e);
            AppError::from_db(e, SLUG_TAKEN)
        })?;

        if product.product_type == ProductType::Print {
            if let Some(ref sizes) = input.print_sizes {
                insert_print_sizes(&mut tx, product.id, sizes).await?;
            }
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Created product {} ({})", product.slug, product.id);
        self.load_detail(product).await
    }

    /// Full update. The slug is regenerated only when the title changed;
    /// a present `print_sizes` list replaces the existing sizes.
    pub async fn update(&self, slug: &str, input: ProductInput) -> Result<ProductDetailDto> {
        let current = self.find_by_slug(slug).await?;
        self.ensure_category(input.category_id).await?;

        let new_slug = if input.title != current.title {
            self.free_slug(&input.title, Some(current.id)).await?
        } else {
            current.slug.clone()
        };

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET category_id = $2, title = $3, slug = $4, description = $5, product_type = $6,
                price = $7, price_usd = $8, width = $9, height = $10, medium = $11,
                year_created = $12, status = $13, is_featured = $14, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(current.id)
        .bind(input.category_id)
        .bind(&input.title)
        .bind(&new_slug)
        .bind(&input.description)
        .bind(input.product_type)
        .bind(input.price)
        .bind(input.price_usd)
        .bind(input.width)
        .bind(input.height)
        .bind(&input.medium)
        .bind(input.year_created)
        .bind(input.status)
        .bind(input.is_featured)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update product: {:?}", e);
            AppError::from_db(e, SLUG_TAKEN)
        })?;

        if let Some(ref sizes) = input.print_sizes {
            sqlx::query("DELETE FROM print_sizes WHERE product_id = $1")
                .bind(product.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to clear print sizes: {:?}", e);
                    AppError::Database(e)
                })?;
            insert_print_sizes(&mut tx, product.id, sizes).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Updated product {} ({})", product.slug, product.id);
        self.load_detail(product).await
    }

    /// Delete stored image files, then the product row with everything hanging off it
    pub async fn delete(&self, slug: &str) -> Result<()> {
        let product = self.find_by_slug(slug).await?;

        let urls = sqlx::query_scalar::<_, String>("SELECT url FROM images WHERE product_id = $1")
            .bind(product.id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list product images: {:?}", e);
                AppError::Database(e)
            })?;

        for url in &urls {
            self.storage.delete_by_url(url).await?;
        }

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Deleted product {} ({}) and {} image file(s)",
            product.slug,
            product.id,
            urls.len()
        );
        Ok(())
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<CategorySummaryDto> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check product category: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(CategorySummaryDto::from)
            .ok_or_else(|| AppError::field("category_id", "The selected category is invalid."))
    }

    /// Slug unique across live and soft-deleted products
    async fn free_slug(&self, title: &str, except: Option<Uuid>) -> Result<String> {
        let pool = &self.pool;
        unique_slug(&slugify(title), FALLBACK_PRODUCT_SLUG, |candidate| async move {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE slug = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(candidate)
            .bind(except)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check product slug: {:?}", e);
                AppError::Database(e)
            })
        })
        .await
    }
}

async fn insert_print_sizes(
    conn: &mut PgConnection,
    product_id: Uuid,
    sizes: &[PrintSizeInput],
) -> Result<()> {
    for size in sizes {
        sqlx::query(
            r#"
            INSERT INTO print_sizes (id, product_id, size_name, width, height, price, price_usd)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(product_id)
        .bind(size.size_name.trim())
        .bind(size.width)
        .bind(size.height)
        .bind(size.price)
        .bind(size.price_usd)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert print size: {:?}", e);
            AppError::from_db(e, "The print size could not be saved.")
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{product_input, scratch_storage, seed_category};
    use rust_decimal::Decimal;

    // None of these tests write image files
    fn service(pool: &PgPool) -> ProductService {
        let (_dir, storage) = scratch_storage();
        ProductService::new(pool.clone(), storage)
    }

    fn titles(items: &[ProductListItemDto]) -> Vec<&str> {
        items.iter().map(|p| p.title.as_str()).collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_update_keeps_slug_when_title_is_unchanged(pool: PgPool) {
        let products = service(&pool);
        let category = seed_category(&pool, "Lukisan").await;

        let created = products
            .create(product_input(category.id, "Senja di Kuta", 2_500_000))
            .await
            .unwrap();
        assert_eq!(created.slug, "senja-di-kuta");

        let mut input = product_input(category.id, "Senja di Kuta", 3_000_000);
        input.status = ProductStatus::Sold;
        let updated = products.update(&created.slug, input).await.unwrap();

        assert_eq!(updated.slug, "senja-di-kuta");
        assert_eq!(updated.price, Decimal::from(3_000_000));
        assert_eq!(updated.status, ProductStatus::Sold);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_renamed_product_skips_slugs_held_by_deleted_products(pool: PgPool) {
        let products = service(&pool);
        let category = seed_category(&pool, "Lukisan").await;

        let retired = products
            .create(product_input(category.id, "Pagi di Ubud", 1_000_000))
            .await
            .unwrap();
        sqlx::query("UPDATE products SET deleted_at = NOW() WHERE id = $1")
            .bind(retired.id)
            .execute(&pool)
            .await
            .unwrap();

        let product = products
            .create(product_input(category.id, "Senja di Kuta", 2_500_000))
            .await
            .unwrap();
        let renamed = products
            .update(
                &product.slug,
                product_input(category.id, "Pagi di Ubud", 2_500_000),
            )
            .await
            .unwrap();

        assert_eq!(renamed.slug, "pagi-di-ubud-2");
        assert!(matches!(
            products.find_by_slug("pagi-di-ubud").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_update_replaces_print_sizes_only_when_given(pool: PgPool) {
        let products = service(&pool);
        let category = seed_category(&pool, "Cetak").await;

        let size = |name: &str, price: i64| PrintSizeInput {
            size_name: name.to_string(),
            width: 30,
            height: 40,
            price: Decimal::from(price),
            price_usd: None,
        };

        let mut input = product_input(category.id, "Barong", 400_000);
        input.product_type = ProductType::Print;
        input.print_sizes = Some(vec![size("A3", 400_000), size("A2", 650_000)]);
        let created = products.create(input).await.unwrap();
        assert_eq!(created.print_sizes.len(), 2);

        let mut input = product_input(category.id, "Barong", 450_000);
        input.product_type = ProductType::Print;
        let kept = products.update(&created.slug, input).await.unwrap();
        assert_eq!(kept.print_sizes.len(), 2);

        let mut input = product_input(category.id, "Barong", 450_000);
        input.product_type = ProductType::Print;
        input.print_sizes = Some(vec![size("A1", 900_000)]);
        let replaced = products.update(&created.slug, input).await.unwrap();
        assert_eq!(replaced.print_sizes.len(), 1);
        assert_eq!(replaced.print_sizes[0].size_name, "A1");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_list_applies_filters_search_and_sort(pool: PgPool) {
        let products = service(&pool);
        let paintings = seed_category(&pool, "Lukisan").await;
        let prints = seed_category(&pool, "Cetak").await;

        products
            .create(product_input(paintings.id, "Senja di Kuta", 2_500_000))
            .await
            .unwrap();
        products
            .create(product_input(paintings.id, "Pagi di Ubud", 1_200_000))
            .await
            .unwrap();
        let mut print = product_input(prints.id, "Senja 50% Off", 300_000);
        print.product_type = ProductType::Print;
        products.create(print).await.unwrap();
        let retired = products
            .create(product_input(paintings.id, "Senja Lama", 100_000))
            .await
            .unwrap();
        sqlx::query("UPDATE products SET deleted_at = NOW() WHERE id = $1")
            .bind(retired.id)
            .execute(&pool)
            .await
            .unwrap();

        let sorted = ListingOrder::Sort;

        let (items, meta) = products
            .list(
                &ProductFilter::default(),
                sorted(SortOption::PriceLow),
                Page::new(None, 12),
            )
            .await
            .unwrap();
        assert_eq!(
            titles(&items),
            vec!["Senja 50% Off", "Pagi di Ubud", "Senja di Kuta"]
        );
        assert_eq!(meta.total, 3);

        let filter = ProductFilter {
            search: Some("senja".to_string()),
            ..Default::default()
        };
        let items = products
            .list_all(&filter, sorted(SortOption::PriceHigh))
            .await
            .unwrap();
        assert_eq!(titles(&items), vec!["Senja di Kuta", "Senja 50% Off"]);

        // `%` in a search term is literal
        let filter = ProductFilter {
            search: Some("50%".to_string()),
            ..Default::default()
        };
        let items = products
            .list_all(&filter, sorted(SortOption::Newest))
            .await
            .unwrap();
        assert_eq!(titles(&items), vec!["Senja 50% Off"]);

        let filter = ProductFilter {
            category_id: Some(paintings.id),
            price_min: Some(Decimal::from(1_000_000)),
            price_max: Some(Decimal::from(2_000_000)),
            ..Default::default()
        };
        let items = products
            .list_all(&filter, sorted(SortOption::Newest))
            .await
            .unwrap();
        assert_eq!(titles(&items), vec!["Pagi di Ubud"]);

        let filter = ProductFilter {
            product_type: Some(ProductType::Print),
            ..Default::default()
        };
        let (items, meta) = products
            .list(&filter, sorted(SortOption::Newest), Page::new(Some(2), 12))
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(meta.total, 1);
    }
}
