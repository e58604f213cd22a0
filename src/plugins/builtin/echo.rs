//! `echo` - repeats the command text back, one message per paragraph.
//!
//! Editing the command re-renders the reply in place; deleting it (or editing
//! it into something that is no longer a command) removes the reply.

use async_trait::async_trait;

use super::command::CommandParser;
use crate::application::errors::PluginError;
use crate::domain::entities::{Message, Response};
use crate::plugins::trait_def::{HandlerResult, Plugin};

pub struct EchoPlugin {
    parser: CommandParser,
}

impl EchoPlugin {
    pub const NAME: &'static str = "echo";

    pub fn new(prefix: &str) -> Result<Self, PluginError> {
        Ok(Self {
            parser: CommandParser::new(prefix)?,
        })
    }

    /// Paragraphs to echo, `None` when the message is not an echo command
    fn render(&self, message: &Message) -> Option<Vec<String>> {
        if message.is_from_bot() {
            return None;
        }
        let cmd = self.parser.parse_named(&message.content, Self::NAME)?;
        let paras = paragraphs(&cmd.rest);
        if paras.is_empty() {
            None
        } else {
            Some(paras)
        }
    }
}

fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

#[async_trait]
impl Plugin for EchoPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Repeat the given text, one message per paragraph"
    }

    async fn on_message_create(&self, message: &Message) -> HandlerResult {
        Ok(self.render(message).map(|paras| {
            paras.into_iter().fold(Response::new(), |r, p| r.with_post(p))
        }))
    }

    async fn on_message_update(&self, _old: &Message, new: &Message) -> HandlerResult {
        Ok(self.render(new).map(Response::edits))
    }
}
