//! Plugin loader - Builds the registry from the configured plugin list

use std::collections::HashMap;
use std::sync::Arc;

use super::builtin;
use super::registry::PluginRegistry;
use super::trait_def::Plugin;
use crate::application::errors::PluginError;

/// Constructor for a plugin instance
pub type PluginFactory = fn() -> Result<Arc<dyn Plugin>, PluginError>;

/// Resolves plugin names to factories and instantiates them in order
pub struct PluginLoader {
    factories: HashMap<String, PluginFactory>,
}

impl PluginLoader {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Loader knowing every plugin shipped with the bot
    pub fn with_builtins() -> Self {
        let mut loader = Self::new();
        for (name, factory) in builtin::factories() {
            loader.add_factory(name, factory);
        }
        loader
    }

    pub fn add_factory(&mut self, name: impl Into<String>, factory: PluginFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Instantiate `names` in order.
    ///
    /// Any failure aborts the whole load; a partial plugin set is never returned.
    pub fn load(&self, names: &[String]) -> Result<PluginRegistry, PluginError> {
        let mut registry = PluginRegistry::new();

        for name in names {
            let factory = self
                .factories
                .get(name)
                .ok_or_else(|| PluginError::Load(format!("Unknown plugin '{}'", name)))?;

            let plugin = factory()
                .map_err(|e| {
                    PluginError::Load(format!("Plugin '{}' failed to initialize: {}", name, e))
                })?;

            if plugin.name() != name {
                return Err(PluginError::Load(format!(
                    "Plugin factory '{}' produced a plugin named '{}'",
                    name,
                    plugin.name()
                )));
            }

            registry.register(plugin)?;
        }

        tracing::info!("Loaded {} plugin(s)", registry.len());
        Ok(registry)
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Plugin for Broken {
        fn name(&self) -> &str {
            "broken"
        }
    }

    fn broken_factory() -> Result<Arc<dyn Plugin>, PluginError> {
        Err(PluginError::Load("no config".to_string()))
    }

    fn mislabeled_factory() -> Result<Arc<dyn Plugin>, PluginError> {
        Ok(Arc::new(Broken))
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_loads_builtins_in_requested_order() {
        let loader = PluginLoader::with_builtins();
        let registry = loader.load(&names(&["ping", "echo"])).unwrap();
        assert_eq!(registry.names(), vec!["ping", "echo"]);
        assert!(registry.iter().all(|p| !p.description().is_empty()));
    }

    #[test]
    fn test_unknown_plugin_aborts_load() {
        let loader = PluginLoader::with_builtins();
        let err = loader.load(&names(&["echo", "nope"])).err().unwrap();
        assert!(matches!(err, PluginError::Load(msg) if msg.contains("nope")));
    }

    #[test]
    fn test_factory_failure_aborts_load() {
        let mut loader = PluginLoader::new();
        loader.add_factory("flaky", broken_factory);
        assert!(loader.load(&names(&["flaky"])).is_err());
    }

    #[test]
    fn test_factory_name_mismatch_is_rejected() {
        let mut loader = PluginLoader::new();
        loader.add_factory("other", mislabeled_factory);
        assert!(loader.load(&names(&["other"])).is_err());
    }

    #[test]
    fn test_duplicate_name_aborts_load() {
        let loader = PluginLoader::with_builtins();
        let err = loader.load(&names(&["echo", "echo"])).err().unwrap();
        assert!(matches!(err, PluginError::Duplicate(_)));
    }
}
