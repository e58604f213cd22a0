//! herald-bot - plugin-driven chat bot runtime
//!
//! Inbound message events are fanned out to the plugins enabled for the
//! place they happened in. The first plugin response is reconciled against
//! what the bot already posted for the same trigger message, so edits and
//! deletes of the trigger keep the bot's output in step.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
