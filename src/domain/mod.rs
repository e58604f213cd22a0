//! Domain layer - Core business objects and the seams to the outside
//!
//! This layer contains:
//! - Entities: Places, messages, events and plugin responses
//! - Traits: Abstractions for infrastructure (Transport, ConfigStore)

pub mod entities;
pub mod traits;
