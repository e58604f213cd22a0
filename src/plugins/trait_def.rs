//! Plugin trait definitions

use async_trait::async_trait;
use crate::application::errors::PluginError;
use crate::domain::entities::{Message, Response};

/// What a plugin handler returns: `Ok(None)` means nothing to say
pub type HandlerResult = Result<Option<Response>, PluginError>;

/// Core plugin trait that all plugins must implement.
///
/// One method per event kind. Handlers may have side effects of their own;
/// the dispatcher runs every enabled plugin even when an earlier one already
/// produced the response that will be shown.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique identifier, also the key under `plugins` in configuration
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    async fn on_message_create(&self, _message: &Message) -> HandlerResult {
        Ok(None)
    }

    async fn on_message_update(&self, _old: &Message, _new: &Message) -> HandlerResult {
        Ok(None)
    }

    async fn on_message_delete(&self, _message: &Message) -> HandlerResult {
        Ok(None)
    }
}
