//! Domain entities - Core business objects with no external dependencies

pub mod event;
pub mod message;
pub mod place;
pub mod response;
pub mod user;

pub use event::{BotEvent, EventKind};
pub use message::{Message, MessageHandle};
pub use place::{Channel, ChannelKind, Guild, Place};
pub use response::{EditContent, PostContent, Response};
pub use user::User;
