//! Persistence of the configuration tree

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::application::config::ConfigTree;
use crate::application::errors::StorageError;
use crate::domain::traits::ConfigStore;

/// JSON file-based store
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> Result<ConfigTree, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, tree: &ConfigTree) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(tree)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store, for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryConfigStore {
    tree: RwLock<ConfigTree>,
}

impl MemoryConfigStore {
    pub fn new(tree: ConfigTree) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<ConfigTree, StorageError> {
        Ok(self.tree.read().await.clone())
    }

    async fn save(&self, tree: &ConfigTree) -> Result<(), StorageError> {
        *self.tree.write().await = tree.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::Scope;

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load().await, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("nested").join("data.json"));

        let mut tree = ConfigTree {
            token: Some("t0k3n".to_string()),
            ..ConfigTree::default()
        };
        tree.set_plugin_enabled(&Scope::Guild("g1".to_string()), "echo", true);

        store.save(&tree).await.unwrap();
        assert_eq!(store.load().await.unwrap(), tree);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_invalid_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonConfigStore::new(path);
        assert!(matches!(store.load().await, Err(StorageError::Serialization(_))));
    }
}
