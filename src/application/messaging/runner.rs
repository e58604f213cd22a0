//! Event loop - one dispatch task per inbound event

use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info};

use super::dispatcher::EventDispatcher;
use crate::domain::entities::BotEvent;

/// Pump `events` into `dispatcher` until the channel closes or `shutdown` fires.
///
/// Dispatches already started are awaited before returning; none is cancelled.
/// Returns the number of events accepted.
pub async fn run_event_loop<F>(
    dispatcher: Arc<EventDispatcher>,
    mut events: mpsc::Receiver<BotEvent>,
    shutdown: F,
) -> usize
where
    F: Future<Output = ()>,
{
    let mut tasks = JoinSet::new();
    let mut accepted = 0;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    accepted += 1;
                    let dispatcher = dispatcher.clone();
                    tasks.spawn(async move {
                        dispatcher.dispatch(event).await;
                    });
                }
                None => break,
            },
            Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = result {
                    error!("Dispatch task failed: {}", e);
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting events");
                break;
            }
        }
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!("Dispatch task failed: {}", e);
        }
    }

    accepted
}
