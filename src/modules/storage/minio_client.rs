//! MinIO/S3-compatible image storage
//!
//! Uses rust-s3 crate for lightweight S3 operations. Objects are written
//! below the public prefix and addressed through the public endpoint.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::ImageStorage;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// MinIO/S3-compatible storage driver
pub struct MinIOStorage {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
}

impl MinIOStorage {
    /// Create a new MinIO driver from configuration, creating the bucket if needed
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let storage = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
        };

        storage.ensure_bucket_exists().await;

        info!(
            "MinIO storage initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            storage.endpoint,
            storage.bucket.name(),
            storage.public_prefix
        );

        Ok(storage)
    }

    /// Create the bucket unless it already exists. Failures are logged; the
    /// bucket may have been provisioned out of band.
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created successfully", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}/{}", self.public_prefix, key)
    }

    fn public_url(&self, full_key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_endpoint,
            self.bucket.name(),
            full_key
        )
    }

    /// Object key for a URL on either the public or the internal endpoint
    fn extract_key_from_url(&self, url: &str) -> Option<String> {
        [&self.public_endpoint, &self.endpoint]
            .into_iter()
            .map(|endpoint| format!("{}/{}/", endpoint, self.bucket.name()))
            .find_map(|prefix| url.strip_prefix(&prefix).map(str::to_string))
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl ImageStorage for MinIOStorage {
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let full_key = self.full_key(key);

        self.bucket
            .put_object_with_content_type(&full_key, &data, content_type)
            .await
            .map_err(|e| {
                AppError::Internal(format!("Failed to upload file '{}': {}", full_key, e))
            })?;

        debug!("Uploaded '{}' to bucket '{}'", full_key, self.bucket.name());
        Ok(self.public_url(&full_key))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
        let Some(key) = self.extract_key_from_url(url) else {
            debug!("Skipping delete of foreign URL {}", url);
            return Ok(());
        };

        match self.bucket.delete_object(&key).await {
            Ok(_) => {
                debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
                Ok(())
            }
            Err(e) if e.to_string().contains("404") || e.to_string().contains("NoSuchKey") => {
                Ok(())
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to delete file '{}': {}",
                key, e
            ))),
        }
    }

    fn driver_name(&self) -> &'static str {
        "minio"
    }
}
