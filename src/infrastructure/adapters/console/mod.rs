//! Console adapter for development/testing
//!
//! Every line typed on stdin becomes a message in one configured channel.
//! Two commands simulate the other event kinds:
//!
//! ```text
//! :edit <id> <new text>
//! :delete <id>
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use crate::application::errors::{BotError, TransportError};
use crate::domain::entities::{
    BotEvent, Channel, EditContent, Message, MessageHandle, PostContent, User,
};
use crate::domain::traits::{BotInfo, Transport};

/// One parsed line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Say(String),
    Edit { id: String, text: String },
    Delete { id: String },
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ConsoleInput {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return ConsoleInput::Empty;
    }

    let Some(command) = line.strip_prefix(':') else {
        return ConsoleInput::Say(line.to_string());
    };

    let mut parts = command.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit"), None, None) => ConsoleInput::Quit,
        (Some("delete"), Some(id), None) if !id.is_empty() => {
            ConsoleInput::Delete { id: id.to_string() }
        }
        (Some("edit"), Some(id), Some(text)) if !id.is_empty() => ConsoleInput::Edit {
            id: id.to_string(),
            text: text.to_string(),
        },
        _ => ConsoleInput::Invalid(line.to_string()),
    }
}

/// Console bot adapter for local development
pub struct ConsoleTransport {
    info: BotInfo,
    channel: Channel,
    user: User,
    history: Mutex<HashMap<String, Message>>,
    next_id: AtomicU64,
}

impl ConsoleTransport {
    pub fn new(name: impl Into<String>, channel: Channel) -> Self {
        let name = name.into();
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.clone(),
                username: name,
            },
            channel,
            user: User::new("console-user").with_username("you"),
            history: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Turn one input line into a transport event, updating the history
    pub async fn handle_input(&self, input: ConsoleInput) -> Option<BotEvent> {
        match input {
            ConsoleInput::Say(text) => {
                let id = format!("u{}", self.next_id.fetch_add(1, Ordering::SeqCst));
                let message =
                    Message::new(&id, self.channel.clone(), text).with_author(self.user.clone());
                self.history.lock().await.insert(id.clone(), message.clone());
                println!("[{} #{}]", self.user, id);
                Some(BotEvent::Created(message))
            }
            ConsoleInput::Edit { id, text } => {
                let mut history = self.history.lock().await;
                let Some(old) = history.get(&id).cloned() else {
                    println!("[console] unknown message #{}", id);
                    return None;
                };
                let mut new = old.clone();
                new.content = text;
                new.timestamp = chrono::Utc::now();
                history.insert(id, new.clone());
                Some(BotEvent::Updated { old, new })
            }
            ConsoleInput::Delete { id } => match self.history.lock().await.remove(&id) {
                Some(message) => Some(BotEvent::Deleted(message)),
                None => {
                    println!("[console] unknown message #{}", id);
                    None
                }
            },
            ConsoleInput::Invalid(line) => {
                println!(
                    "[console] cannot parse '{}', use :edit <id> <text> or :delete <id>",
                    line
                );
                None
            }
            ConsoleInput::Quit | ConsoleInput::Empty => None,
        }
    }

    /// Forward input lines as events until `:quit`, end of input, or until
    /// the receiving side of `events` goes away
    pub async fn read_events<R>(
        &self,
        reader: R,
        events: mpsc::Sender<BotEvent>,
    ) -> Result<(), BotError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            let line = tokio::select! {
                _ = events.closed() => {
                    tracing::debug!("Event receiver dropped, stopping console input");
                    return Ok(());
                }
                line = lines.next_line() => line,
            };
            let line =
                line.map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?;
            let Some(line) = line else {
                break;
            };

            let input = parse_line(&line);
            if input == ConsoleInput::Quit {
                break;
            }
            if let Some(event) = self.handle_input(input).await {
                if events.send(event).await.is_err() {
                    return Err(TransportError::Closed.into());
                }
            }
        }

        tracing::info!("Console input closed");
        Ok(())
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn start(&self, events: mpsc::Sender<BotEvent>) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode) in channel {}", self.channel.id);
        self.read_events(BufReader::new(tokio::io::stdin()), events).await
    }

    async fn send(
        &self,
        channel: &Channel,
        post: &PostContent,
    ) -> Result<MessageHandle, TransportError> {
        let id = format!("b-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        println!("[BOT #{}] {}", id, post.text);
        Ok(MessageHandle::new(id, channel.id.clone()))
    }

    async fn edit(
        &self,
        handle: &MessageHandle,
        edit: &EditContent,
    ) -> Result<MessageHandle, TransportError> {
        println!("[BOT #{} edited] {}", handle.id, edit.text);
        Ok(handle.clone())
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), TransportError> {
        println!("[BOT #{} deleted]", handle.id);
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
