//! Event dispatcher - Fans transport events out to enabled plugins

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::ledger::SentMessageLedger;
use super::reconciler::{ReconcileReport, ResponseReconciler};
use crate::application::config::resolver::{is_enabled, plugin_fragment};
use crate::application::config::ConfigResolver;
use crate::domain::entities::{BotEvent, Place, Response};
use crate::domain::traits::Transport;
use crate::plugins::{HandlerResult, Plugin, PluginRegistry};

/// Routes each event through the plugins and reconciles the result.
///
/// Plugins run in registration order and all of them run, but only the first
/// non-null response reaches the channel. Later responses are dropped.
pub struct EventDispatcher {
    registry: Arc<PluginRegistry>,
    resolver: ConfigResolver,
    reconciler: ResponseReconciler,
}

impl EventDispatcher {
    pub fn new(
        registry: Arc<PluginRegistry>,
        resolver: ConfigResolver,
        transport: Arc<dyn Transport>,
        ledger: Arc<SentMessageLedger>,
    ) -> Self {
        Self {
            registry,
            resolver,
            reconciler: ResponseReconciler::new(transport, ledger),
        }
    }

    pub fn ledger(&self) -> &Arc<SentMessageLedger> {
        self.reconciler.ledger()
    }

    /// Handle one transport event end to end.
    ///
    /// Events sharing a trigger id are serialized for the whole
    /// collect-then-reconcile sequence.
    pub async fn dispatch(&self, event: BotEvent) -> ReconcileReport {
        let trigger_id = event.trigger_id().to_string();
        let _guard = self.ledger().lock(&trigger_id).await;

        let response = self.collect_response(&event).await;
        let report = self
            .reconciler
            .reconcile(event.kind(), &trigger_id, event.channel(), response)
            .await;

        if !report.is_noop() {
            debug!(
                "[{}] {} reconciled: {} sent, {} edited, {} deleted, {} failed",
                trigger_id,
                event.kind(),
                report.sent,
                report.edited,
                report.deleted,
                report.failed
            );
        }
        report
    }

    /// Run every enabled plugin and keep the first non-null response
    pub async fn collect_response(&self, event: &BotEvent) -> Option<Response> {
        let place = Place::from(event.channel());
        let place_config = self.resolver.place_config(&place).await;

        let mut chosen: Option<(String, Response)> = None;

        for plugin in self.registry.iter() {
            if !is_enabled(&plugin_fragment(&place_config, plugin.name())) {
                continue;
            }

            let Some(response) = invoke_isolated(plugin.as_ref(), event).await else {
                continue;
            };

            match &chosen {
                None => chosen = Some((plugin.name().to_string(), response)),
                Some((winner, _)) => debug!(
                    "[{}] Dropping response from '{}', '{}' answered first",
                    event.trigger_id(),
                    plugin.name(),
                    winner
                ),
            }
        }

        chosen.map(|(_, response)| response)
    }
}

async fn invoke(plugin: &dyn Plugin, event: &BotEvent) -> HandlerResult {
    match event {
        BotEvent::Created(message) => plugin.on_message_create(message).await,
        BotEvent::Updated { old, new } => plugin.on_message_update(old, new).await,
        BotEvent::Deleted(message) => plugin.on_message_delete(message).await,
    }
}

/// Invoke a plugin so that an error or panic only costs its own response
async fn invoke_isolated(plugin: &dyn Plugin, event: &BotEvent) -> Option<Response> {
    match AssertUnwindSafe(invoke(plugin, event)).catch_unwind().await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            warn!(
                "[{}] Plugin '{}' failed on {}: {}",
                event.trigger_id(),
                plugin.name(),
                event.kind(),
                e
            );
            None
        }
        Err(_) => {
            error!(
                "[{}] Plugin '{}' panicked on {}",
                event.trigger_id(),
                plugin.name(),
                event.kind()
            );
            None
        }
    }
}
