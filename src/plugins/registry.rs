//! Plugin registry - ordered collection of loaded plugins

use std::sync::Arc;
use tracing::info;

use super::trait_def::Plugin;
use crate::application::errors::PluginError;

/// Registry of plugins in registration order.
///
/// The order is the dispatch order for every event kind.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin at the end of the order
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let name = plugin.name().to_string();
        if self.has_plugin(&name) {
            return Err(PluginError::Duplicate(name));
        }

        info!("Registering plugin: {}", name);
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.iter().find(|p| p.name() == name).cloned()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Plugin for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_keeps_registration_order() {
        let mut registry = PluginRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(Arc::new(Named(name))).unwrap();
        }
        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
        assert!(registry.get("alpha").is_some());
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Named("echo"))).unwrap();
        let err = registry.register(Arc::new(Named("echo"))).unwrap_err();
        assert!(matches!(err, PluginError::Duplicate(n) if n == "echo"));
        assert_eq!(registry.len(), 1);
    }
}
