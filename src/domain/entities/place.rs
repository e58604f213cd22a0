//! Conversation places: guilds and channels.
//!
//! These are read-only views supplied by the transport. The bot never owns
//! them; it only keys configuration fragments by their ids.

/// Kind of channel as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Text,
    Dm,
    Group,
    Voice,
}

impl ChannelKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChannelKind::Text => "text",
            ChannelKind::Dm => "dm",
            ChannelKind::Group => "group",
            ChannelKind::Voice => "voice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guild {
    pub id: String,
    pub name: Option<String>,
}

impl Guild {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    pub id: String,
    pub kind: ChannelKind,
    pub guild: Option<Guild>,
}

impl Channel {
    pub fn new(id: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            kind,
            guild: None,
        }
    }

    /// A guild text channel
    pub fn text(id: impl Into<String>, guild: Guild) -> Self {
        Self {
            id: id.into(),
            kind: ChannelKind::Text,
            guild: Some(guild),
        }
    }

    pub fn dm(id: impl Into<String>) -> Self {
        Self::new(id, ChannelKind::Dm)
    }

    /// The guild whose configuration applies to this channel.
    ///
    /// Only text channels inherit guild settings.
    pub fn config_guild(&self) -> Option<&Guild> {
        match self.kind {
            ChannelKind::Text => self.guild.as_ref(),
            _ => None,
        }
    }
}

/// A conversation context that configuration can be resolved for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Place {
    Guild(Guild),
    Channel(Channel),
}

impl Place {
    pub fn id(&self) -> &str {
        match self {
            Place::Guild(g) => &g.id,
            Place::Channel(c) => &c.id,
        }
    }
}

impl From<Guild> for Place {
    fn from(guild: Guild) -> Self {
        Place::Guild(guild)
    }
}

impl From<Channel> for Place {
    fn from(channel: Channel) -> Self {
        Place::Channel(channel)
    }
}

impl From<&Channel> for Place {
    fn from(channel: &Channel) -> Self {
        Place::Channel(channel.clone())
    }
}
