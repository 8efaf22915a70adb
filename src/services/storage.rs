// src/services/storage.rs
// DOCUMENTATION: Media storage for uploaded images
// PURPOSE: Persist image bytes under the photos/ namespace and build their URLs

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::JournalError;

/// Namespace every photo key lives under
pub const PHOTOS_PREFIX: &str = "photos";

/// Storage backend trait for image files
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Save file data under `key`
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), JournalError>;

    /// Delete the file stored under `key`; missing files are not an error
    async fn delete(&self, key: &str) -> Result<(), JournalError>;

    /// Public URL for `key`
    fn url(&self, key: &str) -> String;
}

/// Shared handle used by handlers and services
pub type MediaStorage = Arc<dyn StorageBackend>;

/// Fresh key for an image with the given extension
pub fn new_photo_key(extension: &str) -> String {
    format!("{}/{}.{}", PHOTOS_PREFIX, Uuid::new_v4().simple(), extension)
}

/// Local filesystem storage rooted at MEDIA_ROOT
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_url: base_url.into(),
        }
    }

    /// Keys are generated by us, but never let one escape the media root
    fn path_for(&self, key: &str) -> Result<PathBuf, JournalError> {
        if key.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
            return Err(JournalError::StorageError(format!("Invalid storage key: {}", key)));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), JournalError> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                JournalError::StorageError(format!("Failed to create directory: {}", e))
            })?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| JournalError::StorageError(format!("Failed to write file: {}", e)))?;

        log::debug!("Stored {} ({} bytes)", key, data.len());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), JournalError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(JournalError::StorageError(format!(
                "Failed to delete file: {}",
                e
            ))),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

/// Delete stored images, logging failures instead of returning them
pub async fn remove_quietly(storage: &dyn StorageBackend, keys: &[String]) {
    for key in keys {
        if let Err(e) = storage.delete(key).await {
            log::warn!("Could not remove stored image {}: {}", key, e);
        }
    }
}

/// In-memory backend for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    files: tokio::sync::RwLock<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.files.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), JournalError> {
        self.files.write().await.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), JournalError> {
        self.files.write().await.remove(key);
        Ok(())
    }

    fn url(&self, key: &str) -> String {
        format!("/media/{}", key)
    }
}
