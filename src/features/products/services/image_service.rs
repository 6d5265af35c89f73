use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{ImageDto, ImageUploadResponseDto, UploadedImage};
use crate::features::products::models::{Image, Product};
use crate::features::products::services::product_service::PRODUCT_COLUMNS;
use crate::modules::storage::{detect_image_type, extension_for, object_key, ImageStorage};
use crate::shared::constants::{MAX_IMAGES_PER_UPLOAD, MAX_IMAGE_SIZE, PRODUCT_IMAGE_DIR};

/// Check every file before anything is stored; one bad file rejects the batch.
/// The image type comes from the file content, not the declared content type.
pub fn validate_uploads(files: &[UploadedImage]) -> Result<()> {
    if files.is_empty() {
        return Err(AppError::field("images", "Please select at least one image."));
    }
    if files.len() > MAX_IMAGES_PER_UPLOAD {
        return Err(AppError::field(
            "images",
            format!("You may upload at most {} images at once.", MAX_IMAGES_PER_UPLOAD),
        ));
    }

    let mut messages = Vec::new();
    for (index, file) in files.iter().enumerate() {
        if detect_image_type(&file.data).is_none() {
            tracing::debug!(
                "Upload {} declared as {:?} is not a supported image",
                index,
                file.content_type
            );
            messages.push(format!("images.{}: Each file must be an image.", index));
        } else if file.data.len() > MAX_IMAGE_SIZE {
            messages.push(format!("images.{}: Each image must not exceed 5MB.", index));
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(messages))
    }
}

/// Sort order and primary flag for the `index`-th new image when the product
/// already has `existing` images
pub fn placement(existing: i64, index: usize) -> (i32, bool) {
    let order = existing as i32 + index as i32;
    (order, existing == 0 && index == 0)
}

/// Service for product image uploads and removal
pub struct ImageService {
    pool: PgPool,
    storage: Arc<dyn ImageStorage>,
}

impl ImageService {
    pub fn new(pool: PgPool, storage: Arc<dyn ImageStorage>) -> Self {
        Self { pool, storage }
    }

    /// Store uploaded files and attach them to the product after its existing
    /// images. Rows are inserted in one transaction; files already stored are
    /// removed again if any later step fails.
    pub async fn upload(
        &self,
        product_slug: &str,
        files: Vec<UploadedImage>,
    ) -> Result<ImageUploadResponseDto> {
        validate_uploads(&files)?;
        let product = self.find_product(product_slug).await?;

        let urls = self.store_files(files).await?;
        let images = match self.attach(product.id, &urls).await {
            Ok(images) => images,
            Err(e) => {
                self.discard(&urls).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Uploaded {} image(s) for product {} via {} storage",
            images.len(),
            product.slug,
            self.storage.driver_name()
        );

        Ok(ImageUploadResponseDto {
            uploaded: images.len(),
            images,
        })
    }

    /// Write every file to storage, returning their URLs in upload order
    async fn store_files(&self, files: Vec<UploadedImage>) -> Result<Vec<String>> {
        let mut urls = Vec::with_capacity(files.len());
        for (index, file) in files.into_iter().enumerate() {
            let stored = match detect_image_type(&file.data) {
                Some(content_type) => {
                    let ext = extension_for(content_type).unwrap_or("bin");
                    let key = object_key(PRODUCT_IMAGE_DIR, ext);
                    self.storage.store(&key, file.data, content_type).await
                }
                None => Err(AppError::field(
                    &format!("images.{}", index),
                    "Each file must be an image.",
                )),
            };

            match stored {
                Ok(url) => urls.push(url),
                Err(e) => {
                    self.discard(&urls).await;
                    return Err(e);
                }
            }
        }
        Ok(urls)
    }

    /// Insert image rows for stored URLs, all or none
    async fn attach(&self, product_id: Uuid, urls: &[String]) -> Result<Vec<ImageDto>> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Serializes concurrent uploads so sort orders stay contiguous
        sqlx::query("SELECT id FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock product for image upload: {:?}", e);
                AppError::Database(e)
            })?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM images WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count product images: {:?}", e);
            AppError::Database(e)
        })?;

        let mut images = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            let (sort_order, is_primary) = placement(existing, index);
            let image = sqlx::query_as::<_, Image>(
                r#"
                INSERT INTO images (id, product_id, url, is_primary, sort_order)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, product_id, url, is_primary, sort_order, created_at, updated_at
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(product_id)
            .bind(url)
            .bind(is_primary)
            .bind(sort_order)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save product image: {:?}", e);
                AppError::Database(e)
            })?;

            images.push(ImageDto::from(image));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(images)
    }

    /// Best-effort removal of files whose upload did not complete
    async fn discard(&self, urls: &[String]) {
        for url in urls {
            if let Err(e) = self.storage.delete_by_url(url).await {
                tracing::warn!("Failed to remove orphaned image {}: {}", url, e);
            }
        }
    }

    /// Remove one image. If it was the primary image, the first remaining
    /// image by sort order becomes primary.
    pub async fn delete(&self, product_slug: &str, image_id: Uuid) -> Result<()> {
        let product = self.find_product(product_slug).await?;

        let image = sqlx::query_as::<_, Image>(
            "SELECT id, product_id, url, is_primary, sort_order, created_at, updated_at FROM images WHERE id = $1",
        )
        .bind(image_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get image: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        if image.product_id != product.id {
            return Err(AppError::Forbidden("Unauthorized action.".to_string()));
        }

        self.storage.delete_by_url(&image.url).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(image.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete image: {:?}", e);
                AppError::Database(e)
            })?;

        if image.is_primary {
            sqlx::query(
                r#"
                UPDATE images SET is_primary = TRUE, updated_at = NOW()
                WHERE id = (
                    SELECT id FROM images WHERE product_id = $1
                    ORDER BY sort_order, created_at
                    LIMIT 1
                )
                "#,
            )
            .bind(product.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to promote primary image: {:?}", e);
                AppError::Database(e)
            })?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Deleted image {} from product {}", image.id, product.slug);
        Ok(())
    }

    async fn find_product(&self, slug: &str) -> Result<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE slug = $1 AND deleted_at IS NULL",
            PRODUCT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product by slug: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", slug)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::products::services::ProductService;
    use crate::shared::test_helpers::{
        lazy_pool, product_input, scratch_storage, seed_category,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    const WEBP: &[u8] = b"RIFF\x24\0\0\0WEBPVP8 ";

    /// `header` padded with zeros to `size` bytes
    fn upload(content_type: &str, header: &[u8], size: usize) -> UploadedImage {
        let mut data = header.to_vec();
        data.resize(size.max(header.len()), 0);
        UploadedImage {
            content_type: Some(content_type.to_string()),
            data,
        }
    }

    /// Storage that fails on the `fail_at`-th store and records deletions
    struct FlakyStorage {
        fail_at: usize,
        stored: Mutex<Vec<String>>,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageStorage for FlakyStorage {
        async fn store(&self, key: &str, _data: Vec<u8>, _content_type: &str) -> Result<String> {
            let mut stored = self.stored.lock().unwrap();
            if stored.len() == self.fail_at {
                return Err(AppError::Internal("disk full".to_string()));
            }
            let url = format!("/storage/{}", key);
            stored.push(url.clone());
            Ok(url)
        }

        async fn delete_by_url(&self, url: &str) -> Result<()> {
            self.deleted.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn driver_name(&self) -> &'static str {
            "flaky"
        }
    }

    #[test]
    fn test_first_upload_becomes_primary() {
        assert_eq!(placement(0, 0), (0, true));
        assert_eq!(placement(0, 1), (1, false));
        assert_eq!(placement(0, 2), (2, false));
    }

    #[test]
    fn test_later_uploads_append_after_existing() {
        assert_eq!(placement(3, 0), (3, false));
        assert_eq!(placement(3, 1), (4, false));
    }

    #[test]
    fn test_validate_uploads_accepts_images() {
        let files = vec![
            upload("image/jpeg", JPEG, 1024),
            upload("image/webp", WEBP, MAX_IMAGE_SIZE),
        ];
        assert!(validate_uploads(&files).is_ok());
    }

    #[test]
    fn test_validate_uploads_goes_by_content_not_declared_type() {
        // Mislabelled but real image
        let files = vec![upload("application/octet-stream", PNG, 64)];
        assert!(validate_uploads(&files).is_ok());

        let files = vec![upload("image/png", b"<html><script>alert(1)</script></html>", 64)];
        let AppError::Validation(messages) = validate_uploads(&files).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["images.0: Each file must be an image.".to_string()]);
    }

    #[test]
    fn test_validate_uploads_requires_a_file() {
        let AppError::Validation(messages) = validate_uploads(&[]).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["images: Please select at least one image.".to_string()]);
    }

    #[test]
    fn test_validate_uploads_rejects_non_images_and_oversized_files() {
        let files = vec![
            upload("image/png", PNG, 10),
            upload("application/pdf", b"%PDF-1.7\n", 10),
            upload("image/png", PNG, MAX_IMAGE_SIZE + 1),
            UploadedImage {
                content_type: None,
                data: vec![1, 2, 3],
            },
        ];
        let AppError::Validation(messages) = validate_uploads(&files).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec![
                "images.1: Each file must be an image.".to_string(),
                "images.2: Each image must not exceed 5MB.".to_string(),
                "images.3: Each file must be an image.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_store_removes_files_already_stored() {
        let storage = Arc::new(FlakyStorage {
            fail_at: 2,
            stored: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        });
        let service = ImageService::new(lazy_pool(), storage.clone());

        let files = vec![
            upload("image/png", PNG, 32),
            upload("image/jpeg", JPEG, 32),
            upload("image/webp", WEBP, 32),
        ];
        let err = service.store_files(files).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        let stored = storage.stored.lock().unwrap().clone();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].ends_with(".png"));
        assert!(stored[1].ends_with(".jpg"));
        assert_eq!(*storage.deleted.lock().unwrap(), stored);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_upload_appends_after_existing_images(pool: PgPool) {
        let (_dir, storage) = scratch_storage();
        let products = ProductService::new(pool.clone(), storage.clone());
        let images = ImageService::new(pool.clone(), storage);

        let category = seed_category(&pool, "Lukisan").await;
        let product = products
            .create(product_input(category.id, "Senja di Kuta", 2_500_000))
            .await
            .unwrap();

        let first = images
            .upload(&product.slug, vec![upload("image/png", PNG, 32)])
            .await
            .unwrap();
        assert_eq!(first.uploaded, 1);
        assert!(first.images[0].is_primary);
        assert!(first.images[0].url.ends_with(".png"));

        let second = images
            .upload(
                &product.slug,
                vec![upload("image/png", JPEG, 32), upload("image/webp", WEBP, 32)],
            )
            .await
            .unwrap();
        let placed: Vec<(i32, bool)> = second.images.iter().map(|i| (i.order, i.is_primary)).collect();
        assert_eq!(placed, vec![(1, false), (2, false)]);
        assert!(second.images[0].url.ends_with(".jpg"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_deleting_primary_image_promotes_the_next_one(pool: PgPool) {
        let (dir, storage) = scratch_storage();
        let products = ProductService::new(pool.clone(), storage.clone());
        let images = ImageService::new(pool.clone(), storage);

        let category = seed_category(&pool, "Lukisan").await;
        let product = products
            .create(product_input(category.id, "Sawah Ubud", 1_800_000))
            .await
            .unwrap();

        let uploaded = images
            .upload(
                &product.slug,
                vec![
                    upload("image/png", PNG, 32),
                    upload("image/jpeg", JPEG, 32),
                    upload("image/webp", WEBP, 32),
                ],
            )
            .await
            .unwrap()
            .images;

        images.delete(&product.slug, uploaded[0].id).await.unwrap();

        let detail = products.get_detail(&product.slug).await.unwrap();
        let remaining: Vec<(Uuid, bool)> = detail.images.iter().map(|i| (i.id, i.is_primary)).collect();
        assert_eq!(remaining, vec![(uploaded[1].id, true), (uploaded[2].id, false)]);

        let removed_file = uploaded[0].url.trim_start_matches("/storage/");
        assert!(!dir.path().join(removed_file).exists());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_delete_rejects_image_of_another_product(pool: PgPool) {
        let (_dir, storage) = scratch_storage();
        let products = ProductService::new(pool.clone(), storage.clone());
        let images = ImageService::new(pool.clone(), storage);

        let category = seed_category(&pool, "Cetak").await;
        let owner = products
            .create(product_input(category.id, "Pura Besakih", 900_000))
            .await
            .unwrap();
        let other = products
            .create(product_input(category.id, "Danau Batur", 900_000))
            .await
            .unwrap();

        let image = images
            .upload(&owner.slug, vec![upload("image/png", PNG, 32)])
            .await
            .unwrap()
            .images
            .remove(0);

        let err = images.delete(&other.slug, image.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = images.delete(&owner.slug, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
