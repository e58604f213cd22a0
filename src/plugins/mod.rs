//! Plugin system for herald-bot
//!
//! Plugins react to message create/update/delete events and return the
//! output they want in the channel. They are loaded once at startup, in the
//! order the app config lists them.

pub mod builtin;
pub mod loader;
pub mod registry;
pub mod trait_def;

pub use loader::PluginLoader;
pub use registry::PluginRegistry;
pub use trait_def::{HandlerResult, Plugin};
