//! Image storage drivers.
//!
//! Product images are written through [`ImageStorage`] and addressed by the
//! public URL the driver returns. The local driver writes below a directory
//! served by the HTTP layer; the MinIO driver writes to an S3-compatible bucket.

mod local_disk;
mod minio_client;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::config::{StorageConfig, StorageDriver};
use crate::core::error::AppError;
use crate::shared::constants::ALLOWED_IMAGE_TYPES;

pub use local_disk::LocalDiskStorage;
pub use minio_client::MinIOStorage;

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `data` under `key` (e.g. `products/<uuid>.jpg`) and return its public URL
    async fn store(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    /// Delete the object behind a public URL. URLs this driver did not produce
    /// and objects that are already gone are ignored.
    async fn delete_by_url(&self, url: &str) -> Result<(), AppError>;

    fn driver_name(&self) -> &'static str;
}

/// Build the configured storage driver
pub async fn build_storage(config: &StorageConfig) -> Result<Arc<dyn ImageStorage>, AppError> {
    match config.driver {
        StorageDriver::Local => Ok(Arc::new(LocalDiskStorage::new(
            config.local_root.clone(),
            config.public_url_prefix.clone(),
        ))),
        StorageDriver::MinIO => Ok(Arc::new(MinIOStorage::new(config.minio.clone()).await?)),
    }
}

/// MIME type of an accepted image format, detected from the file's leading
/// bytes. The client-declared content type is never trusted.
pub fn detect_image_type(data: &[u8]) -> Option<&'static str> {
    let kind = infer::get(data)?;
    ALLOWED_IMAGE_TYPES
        .iter()
        .copied()
        .find(|allowed| *allowed == kind.mime_type())
}

/// File extension for an accepted image MIME type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Fresh object key `{dir}/{uuid}.{ext}`
pub fn object_key(dir: &str, ext: &str) -> String {
    format!("{}/{}.{}", dir, Uuid::now_v7(), ext)
}
