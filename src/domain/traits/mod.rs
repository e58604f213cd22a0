//! Domain traits - Abstractions for infrastructure implementations

pub mod store;
pub mod transport;

pub use store::ConfigStore;
pub use transport::{BotInfo, Transport};
