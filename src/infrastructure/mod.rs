//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: App configuration loading
//! - Storage: Configuration tree persistence
//! - Adapters: Platform integrations (console)

pub mod adapters;
pub mod config;
pub mod storage;
