//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Config: Layered settings store and resolver
//! - Errors: Domain-specific errors
//! - Messaging: Event dispatching, sent message ledger, reconciliation

pub mod config;
pub mod errors;
pub mod messaging;
