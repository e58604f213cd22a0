//! In-memory configuration store backed by a persistence collaborator

use std::sync::Arc;
use tokio::sync::RwLock;

use super::tree::{ConfigTree, Scope};
use crate::application::errors::{ConfigError, StorageError};
use crate::domain::traits::ConfigStore;

/// Holds the live configuration tree and writes it back on request
pub struct SettingsStore {
    persistence: Arc<dyn ConfigStore>,
    tree: RwLock<ConfigTree>,
}

impl SettingsStore {
    pub fn new(persistence: Arc<dyn ConfigStore>, tree: ConfigTree) -> Self {
        Self {
            persistence,
            tree: RwLock::new(tree),
        }
    }

    /// Load the tree through the persistence collaborator
    pub async fn load(persistence: Arc<dyn ConfigStore>) -> Result<Self, StorageError> {
        let tree = persistence.load().await?;
        tracing::debug!(
            "Loaded configuration: {} guild layer(s), {} channel layer(s)",
            tree.guilds.len(),
            tree.channels.len()
        );
        Ok(Self::new(persistence, tree))
    }

    /// Run `f` against the current tree under a read lock
    pub async fn read<R>(&self, f: impl FnOnce(&ConfigTree) -> R) -> R {
        let tree = self.tree.read().await;
        f(&tree)
    }

    pub async fn snapshot(&self) -> ConfigTree {
        self.tree.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.tree.read().await.token.clone()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        self.tree.write().await.token = Some(token.into());
    }

    /// The bot token, or a fatal config error when it is absent or blank
    pub async fn require_token(&self) -> Result<String, ConfigError> {
        match self.token().await {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ConfigError::MissingField("token".to_string())),
        }
    }

    pub async fn set_plugin_enabled(&self, scope: &Scope, plugin: &str, enabled: bool) {
        let mut tree = self.tree.write().await;
        tree.set_plugin_enabled(scope, plugin, enabled);
        tracing::info!(
            "Plugin '{}' {} for {}",
            plugin,
            if enabled { "enabled" } else { "disabled" },
            scope
        );
    }

    /// Write the current tree back through the persistence collaborator
    pub async fn save(&self) -> Result<(), StorageError> {
        let tree = self.snapshot().await;
        self.persistence.save(&tree).await
    }
}
