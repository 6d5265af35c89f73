use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::ImageStorage;
use crate::core::error::AppError;

/// Stores images on the local filesystem below `root`, served at `url_prefix`
pub struct LocalDiskStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalDiskStorage {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self { root, url_prefix }
    }

    /// Relative key for a URL produced by this driver, if it is one
    fn key_from_url(&self, url: &str) -> Option<String> {
        let key = url
            .strip_prefix(&self.url_prefix)?
            .strip_prefix('/')?
            .to_string();

        let safe = !key.is_empty()
            && Path::new(&key)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        safe.then_some(key)
    }
}

#[async_trait]
impl ImageStorage for LocalDiskStorage {
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, AppError> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Internal(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write file {:?}: {}", path, e)))?;

        debug!("Stored {} bytes at {:?}", data.len(), path);
        Ok(format!("{}/{}", self.url_prefix, key))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
        let Some(key) = self.key_from_url(url) else {
            debug!("Skipping delete of foreign URL {}", url);
            return Ok(());
        };

        let path = self.root.join(&key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to delete file {:?}: {}",
                path, e
            ))),
        }
    }

    fn driver_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalDiskStorage {
        LocalDiskStorage::new(dir.path().to_path_buf(), "/storage".to_string())
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let url = storage
            .store("products/abc.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "/storage/products/abc.png");
        let written = std::fs::read(dir.path().join("products/abc.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_by_url_removes_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let url = storage
            .store("products/gone.jpg", vec![9], "image/jpeg")
            .await
            .unwrap();

        storage.delete_by_url(&url).await.unwrap();
        assert!(!dir.path().join("products/gone.jpg").exists());

        // Second delete is a no-op
        storage.delete_by_url(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_ignores_foreign_and_traversal_urls() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        std::fs::write(dir.path().join("keep.txt"), b"x").unwrap();

        storage
            .delete_by_url("https://cdn.example.com/keep.txt")
            .await
            .unwrap();
        storage
            .delete_by_url("/storage/../keep.txt")
            .await
            .unwrap();

        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_key_from_url() {
        let storage = LocalDiskStorage::new(PathBuf::from("/tmp"), "/storage".to_string());
        assert_eq!(
            storage.key_from_url("/storage/products/a.png"),
            Some("products/a.png".to_string())
        );
        assert_eq!(storage.key_from_url("/storageX/products/a.png"), None);
        assert_eq!(storage.key_from_url("/storage/"), None);
        assert_eq!(storage.key_from_url("/storage/products/../../etc"), None);
    }
}
