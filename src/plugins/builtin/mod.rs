//! Plugins shipped with the bot

pub mod command;
pub mod echo;
pub mod ping;

use std::sync::Arc;

use super::loader::PluginFactory;
use super::trait_def::Plugin;
use crate::application::errors::PluginError;

pub use command::{Command, CommandParser};
pub use echo::EchoPlugin;
pub use ping::PingPlugin;

pub const DEFAULT_PREFIX: &str = "!";

fn echo() -> Result<Arc<dyn Plugin>, PluginError> {
    Ok(Arc::new(EchoPlugin::new(DEFAULT_PREFIX)?))
}

fn ping() -> Result<Arc<dyn Plugin>, PluginError> {
    Ok(Arc::new(PingPlugin::new(DEFAULT_PREFIX)?))
}

/// Name and factory of every built-in plugin
pub fn factories() -> Vec<(&'static str, PluginFactory)> {
    vec![
        (EchoPlugin::NAME, echo as PluginFactory),
        (PingPlugin::NAME, ping as PluginFactory),
    ]
}
