//! Layered configuration tree
//!
//! Three layers, in increasing precedence: `defaults`, `guilds[id]`,
//! `channels[id]`. Each layer is a free-form JSON object; the resolver only
//! looks at `plugins.<name>.enabled`, everything else belongs to plugins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One precedence tier of settings
pub type ConfigLayer = Map<String, Value>;

/// The persisted configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub defaults: ConfigLayer,
    #[serde(default)]
    pub guilds: BTreeMap<String, ConfigLayer>,
    #[serde(default)]
    pub channels: BTreeMap<String, ConfigLayer>,
}

/// Which layer of the tree a write targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Defaults,
    Guild(String),
    Channel(String),
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Defaults => write!(f, "defaults"),
            Scope::Guild(id) => write!(f, "guild {}", id),
            Scope::Channel(id) => write!(f, "channel {}", id),
        }
    }
}

impl ConfigTree {
    pub fn guild(&self, id: &str) -> Option<&ConfigLayer> {
        self.guilds.get(id)
    }

    pub fn channel(&self, id: &str) -> Option<&ConfigLayer> {
        self.channels.get(id)
    }

    /// Mutable access to a layer, creating it when missing
    pub fn layer_mut(&mut self, scope: &Scope) -> &mut ConfigLayer {
        match scope {
            Scope::Defaults => &mut self.defaults,
            Scope::Guild(id) => self.guilds.entry(id.clone()).or_default(),
            Scope::Channel(id) => self.channels.entry(id.clone()).or_default(),
        }
    }

    /// Set `plugins.<plugin>.enabled` in one layer
    pub fn set_plugin_enabled(&mut self, scope: &Scope, plugin: &str, enabled: bool) {
        let layer = self.layer_mut(scope);
        let plugins = object_entry(layer, "plugins");
        let fragment = object_entry(plugins, plugin);
        fragment.insert("enabled".to_string(), Value::Bool(enabled));
    }
}

/// Get `map[key]` as an object, replacing any scalar that sits there
fn object_entry<'a>(map: &'a mut ConfigLayer, key: &str) -> &'a mut ConfigLayer {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(m) => m,
        _ => unreachable!("slot was just made an object"),
    }
}

/// Recursively merge `overlay` into `base`.
///
/// Objects on both sides merge key by key; anything else (scalars, arrays,
/// an object meeting a scalar) is replaced outright by the overlay.
pub fn deep_merge(base: &mut ConfigLayer, overlay: &ConfigLayer) {
    for (key, value) in overlay {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (base.get_mut(key), value)
        {
            deep_merge(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

/// Merge layers lowest precedence first; missing layers count as empty
pub fn merge_layers<'a, I>(layers: I) -> ConfigLayer
where
    I: IntoIterator<Item = Option<&'a ConfigLayer>>,
{
    let mut merged = ConfigLayer::new();
    for layer in layers.into_iter().flatten() {
        deep_merge(&mut merged, layer);
    }
    merged
}
