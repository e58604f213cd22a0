use super::{Channel, User};
use chrono::{DateTime, Utc};

/// A chat message observed on the transport
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel: Channel,
    pub author: Option<User>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: impl Into<String>, channel: Channel, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel,
            author: None,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_author(mut self, user: User) -> Self {
        self.author = Some(user);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// True when the message was written by a bot account
    pub fn is_from_bot(&self) -> bool {
        self.author.as_ref().map(|u| u.is_bot).unwrap_or(false)
    }
}

/// Reference to a message the bot has put on the transport.
///
/// Returned by `send` and `edit`; the only thing the reconciler keeps
/// about its own output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub id: String,
    pub channel_id: String,
}

impl MessageHandle {
    pub fn new(id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
        }
    }
}

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.id)
    }
}
