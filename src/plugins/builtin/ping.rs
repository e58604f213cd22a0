//! `ping` - answers with the delay between the message timestamp and now.
//!
//! The reply outlives the command: deleting `!ping` keeps the answer.

use async_trait::async_trait;
use chrono::Utc;

use super::command::CommandParser;
use crate::application::errors::PluginError;
use crate::domain::entities::{Message, Response};
use crate::plugins::trait_def::{HandlerResult, Plugin};

pub struct PingPlugin {
    parser: CommandParser,
}

impl PingPlugin {
    pub const NAME: &'static str = "ping";

    pub fn new(prefix: &str) -> Result<Self, PluginError> {
        Ok(Self {
            parser: CommandParser::new(prefix)?,
        })
    }

    fn reply(&self, message: &Message) -> Option<String> {
        self.parser.parse_named(&message.content, Self::NAME)?;
        let latency = (Utc::now() - message.timestamp).num_milliseconds().max(0);
        Some(format!("pong ({} ms)", latency))
    }
}

#[async_trait]
impl Plugin for PingPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Reply with the message latency"
    }

    async fn on_message_create(&self, message: &Message) -> HandlerResult {
        Ok(self.reply(message).map(Response::post))
    }

    async fn on_message_update(&self, _old: &Message, new: &Message) -> HandlerResult {
        Ok(self.reply(new).map(|text| Response::edits([text])))
    }

    async fn on_message_delete(&self, message: &Message) -> HandlerResult {
        if self.parser.parse_named(&message.content, Self::NAME).is_some() {
            Ok(Some(Response::new().keep_on_delete()))
        } else {
            Ok(None)
        }
    }
}
