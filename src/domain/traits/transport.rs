use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::errors::{BotError, TransportError};
use crate::domain::entities::{BotEvent, Channel, EditContent, MessageHandle, PostContent};

/// Transport trait - abstraction for chat platform adapters
#[async_trait]
pub trait Transport: Send + Sync {
    /// Start listening and push every inbound event into `events`.
    ///
    /// Returns when the platform connection ends or the receiver is dropped.
    async fn start(&self, events: mpsc::Sender<BotEvent>) -> Result<(), BotError>;

    /// Send a new message to a channel
    async fn send(
        &self,
        channel: &Channel,
        post: &PostContent,
    ) -> Result<MessageHandle, TransportError>;

    /// Edit a message the bot sent earlier
    async fn edit(
        &self,
        handle: &MessageHandle,
        edit: &EditContent,
    ) -> Result<MessageHandle, TransportError>;

    /// Delete a message the bot sent earlier
    async fn delete(&self, handle: &MessageHandle) -> Result<(), TransportError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
