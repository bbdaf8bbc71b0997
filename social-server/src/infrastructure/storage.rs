use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Public file storage for uploaded images.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Writes `bytes` under `directory` with a generated name and returns
    /// the path relative to the storage root.
    async fn store(
        &self,
        directory: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, DomainError>;
}

/// Builds `<directory>/<uuid>[.<ext>]` from the client supplied name.
pub fn generated_path(directory: &str, original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    let directory = directory.trim_matches('/');
    match extension {
        Some(ext) => format!("{}/{}.{}", directory, Uuid::new_v4(), ext),
        None => format!("{}/{}", directory, Uuid::new_v4()),
    }
}

#[derive(Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(
        &self,
        directory: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let relative = generated_path(directory, original_name);
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                error!("failed to create storage directory {}: {}", parent.display(), e);
                DomainError::Internal(format!("storage error: {}", e))
            })?;
        }

        tokio::fs::write(&target, bytes).await.map_err(|e| {
            error!("failed to write {}: {}", target.display(), e);
            DomainError::Internal(format!("storage error: {}", e))
        })?;

        info!(path = %relative, size = bytes.len(), "file stored");
        Ok(relative)
    }
}

/// Keeps stored files in memory; used by the handler tests.
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryImageStorage {
    files: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl InMemoryImageStorage {
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

#[cfg(test)]
#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn store(
        &self,
        directory: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let relative = generated_path(directory, original_name);
        self.files
            .lock()
            .unwrap()
            .insert(relative.clone(), bytes.to_vec());
        Ok(relative)
    }
}
