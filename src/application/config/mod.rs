//! Cascading configuration: tree, store and resolver

pub mod resolver;
pub mod store;
pub mod tree;

pub use resolver::ConfigResolver;
pub use store::SettingsStore;
pub use tree::{deep_merge, ConfigLayer, ConfigTree, Scope};
