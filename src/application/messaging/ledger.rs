//! Sent message ledger
//!
//! Maps a trigger message id to the handles of the messages the bot sent in
//! reply to it, in the order they appear in the channel. Callers that read,
//! reconcile and write back an entry must hold [`SentMessageLedger::lock`]
//! for that trigger for the whole sequence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};

use crate::domain::entities::MessageHandle;

/// Exclusive access to one trigger id; released on drop
pub type TriggerGuard = OwnedMutexGuard<()>;

#[derive(Default)]
pub struct SentMessageLedger {
    entries: RwLock<HashMap<String, Vec<MessageHandle>>>,
    locks: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl SentMessageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles sent for `trigger_id`, empty when there is no entry
    pub async fn get(&self, trigger_id: &str) -> Vec<MessageHandle> {
        self.entries
            .read()
            .await
            .get(trigger_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set(&self, trigger_id: &str, handles: Vec<MessageHandle>) {
        self.entries.write().await.insert(trigger_id.to_string(), handles);
    }

    pub async fn delete(&self, trigger_id: &str) {
        self.entries.write().await.remove(trigger_id);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Wait for exclusive access to `trigger_id`.
    ///
    /// Waiters are served in arrival order. Lock slots are only weakly held
    /// here, so a trigger nobody is working on costs nothing.
    pub async fn lock(&self, trigger_id: &str) -> TriggerGuard {
        let mutex = self.lock_slot(trigger_id);
        mutex.lock_owned().await
    }

    fn lock_slot(&self, trigger_id: &str) -> Arc<AsyncMutex<()>> {
        // Every critical section is a single insert or retain,
        // so a poisoned map is still consistent
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = locks.get(trigger_id).and_then(Weak::upgrade) {
            return existing;
        }

        locks.retain(|_, slot| slot.strong_count() > 0);
        let mutex = Arc::new(AsyncMutex::new(()));
        locks.insert(trigger_id.to_string(), Arc::downgrade(&mutex));
        mutex
    }

    #[cfg(test)]
    fn live_lock_slots(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.values().filter(|slot| slot.strong_count() > 0).count()
    }
}
