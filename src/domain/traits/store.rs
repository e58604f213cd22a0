use async_trait::async_trait;
use crate::application::config::ConfigTree;
use crate::application::errors::StorageError;

/// Store trait - persistence of the layered configuration tree
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self) -> Result<ConfigTree, StorageError>;
    async fn save(&self, tree: &ConfigTree) -> Result<(), StorageError>;
}
