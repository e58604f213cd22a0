use super::{Channel, Message};

/// The three event kinds a transport emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Create,
    Update,
    Delete,
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound transport event
#[derive(Debug, Clone)]
pub enum BotEvent {
    Created(Message),
    Updated { old: Message, new: Message },
    Deleted(Message),
}

impl BotEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BotEvent::Created(_) => EventKind::Create,
            BotEvent::Updated { .. } => EventKind::Update,
            BotEvent::Deleted(_) => EventKind::Delete,
        }
    }

    /// The message the event is about (the new version for updates)
    pub fn message(&self) -> &Message {
        match self {
            BotEvent::Created(m) | BotEvent::Deleted(m) => m,
            BotEvent::Updated { new, .. } => new,
        }
    }

    /// Id of the message whose bot output gets reconciled
    pub fn trigger_id(&self) -> &str {
        &self.message().id
    }

    pub fn channel(&self) -> &Channel {
        &self.message().channel
    }
}
