//! Recording transport shared by the messaging tests

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::application::errors::{BotError, TransportError};
use crate::domain::entities::{BotEvent, Channel, EditContent, MessageHandle, PostContent};
use crate::domain::traits::{BotInfo, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Send { channel: String, text: String },
    Edit { id: String, text: String },
    Delete { id: String },
}

#[derive(Default)]
pub struct RecordingTransport {
    ops: Mutex<Vec<Op>>,
    counter: Mutex<usize>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `id` (or every send of text `id`) fail
    pub fn fail_on(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    fn fails(&self, key: &str) -> bool {
        self.failing.lock().unwrap().contains(key)
    }

    fn next_id(&self) -> usize {
        let mut c = self.counter.lock().unwrap();
        *c += 1;
        *c
    }
}

pub fn handle(id: &str) -> MessageHandle {
    MessageHandle::new(id, "c1")
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn start(&self, _events: mpsc::Sender<BotEvent>) -> Result<(), BotError> {
        Ok(())
    }

    async fn send(
        &self,
        channel: &Channel,
        post: &PostContent,
    ) -> Result<MessageHandle, TransportError> {
        self.ops.lock().unwrap().push(Op::Send {
            channel: channel.id.clone(),
            text: post.text.clone(),
        });
        if self.fails(&post.text) {
            return Err(TransportError::send("injected"));
        }
        Ok(MessageHandle::new(format!("s{}", self.next_id()), channel.id.clone()))
    }

    async fn edit(
        &self,
        handle: &MessageHandle,
        edit: &EditContent,
    ) -> Result<MessageHandle, TransportError> {
        self.ops.lock().unwrap().push(Op::Edit {
            id: handle.id.clone(),
            text: edit.text.clone(),
        });
        if self.fails(&handle.id) {
            return Err(TransportError::edit("injected"));
        }
        Ok(MessageHandle::new(format!("{}'", handle.id), handle.channel_id.clone()))
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), TransportError> {
        self.ops.lock().unwrap().push(Op::Delete { id: handle.id.clone() });
        if self.fails(&handle.id) {
            return Err(TransportError::delete("injected"));
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "test".to_string(),
            name: "test".to_string(),
            username: "test".to_string(),
        }
    }
}
