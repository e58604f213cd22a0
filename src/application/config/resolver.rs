//! Effective settings per place and per plugin

use serde_json::Value;
use std::sync::Arc;

use super::store::SettingsStore;
use super::tree::{merge_layers, ConfigLayer, ConfigTree};
use crate::domain::entities::Place;

/// Resolves cascading configuration against the live settings store
#[derive(Clone)]
pub struct ConfigResolver {
    settings: Arc<SettingsStore>,
}

impl ConfigResolver {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// `defaults` merged with the guild layer and, for channels, the channel layer
    pub async fn place_config(&self, place: &Place) -> ConfigLayer {
        self.settings.read(|tree| resolve_place(tree, place)).await
    }

    pub async fn plugin_config(&self, plugin: &str, place: &Place) -> ConfigLayer {
        plugin_fragment(&self.place_config(place).await, plugin)
    }

    pub async fn is_plugin_enabled(&self, plugin: &str, place: &Place) -> bool {
        is_enabled(&self.plugin_config(plugin, place).await)
    }
}

/// Merge the layers that apply to `place`.
///
/// A channel only picks up its guild's layer when it is a text channel.
pub fn resolve_place(tree: &ConfigTree, place: &Place) -> ConfigLayer {
    match place {
        Place::Guild(guild) => merge_layers([Some(&tree.defaults), tree.guild(&guild.id)]),
        Place::Channel(channel) => {
            let guild_layer = channel.config_guild().and_then(|g| tree.guild(&g.id));
            merge_layers([Some(&tree.defaults), guild_layer, tree.channel(&channel.id)])
        }
    }
}

/// `plugins.<plugin>` of a resolved place config, empty when absent
pub fn plugin_fragment(place_config: &ConfigLayer, plugin: &str) -> ConfigLayer {
    place_config
        .get("plugins")
        .and_then(|p| p.get(plugin))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Only a literal boolean `true` enables a plugin
pub fn is_enabled(fragment: &ConfigLayer) -> bool {
    matches!(fragment.get("enabled"), Some(Value::Bool(true)))
}
