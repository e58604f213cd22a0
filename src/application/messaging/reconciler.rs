//! Response reconciler - converges the bot's visible output for a trigger
//! message to the desired state declared by a plugin response.
//!
//! Every transport call is independent. A failure is logged and the
//! remaining calls still run. The ledger only records confirmed outcomes: a
//! handle leaves it after a successful delete, is replaced after a successful
//! edit, and is appended after a successful send.

use std::sync::Arc;
use tracing::{debug, warn};

use super::ledger::SentMessageLedger;
use crate::domain::entities::{
    Channel, EditContent, EventKind, MessageHandle, PostContent, Response,
};
use crate::domain::traits::Transport;

/// Counts of transport calls issued during one reconciliation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub sent: usize,
    pub edited: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

pub struct ResponseReconciler {
    transport: Arc<dyn Transport>,
    ledger: Arc<SentMessageLedger>,
}

impl ResponseReconciler {
    pub fn new(transport: Arc<dyn Transport>, ledger: Arc<SentMessageLedger>) -> Self {
        Self { transport, ledger }
    }

    pub fn ledger(&self) -> &Arc<SentMessageLedger> {
        &self.ledger
    }

    /// Reconcile the output of `trigger_id` against `response`.
    ///
    /// The caller must hold `ledger.lock(trigger_id)`.
    pub async fn reconcile(
        &self,
        kind: EventKind,
        trigger_id: &str,
        channel: &Channel,
        response: Option<Response>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let Some(response) = response else {
            if kind == EventKind::Create {
                return report;
            }
            let mut sent = self.ledger.get(trigger_id).await;
            self.delete_all(trigger_id, &mut sent, &mut report).await;
            self.persist(trigger_id, sent).await;
            return report;
        };

        let mut sent = self.ledger.get(trigger_id).await;
        let Response { mut posts, edits, keep_on_delete } = response;

        match edits {
            None => {
                if kind == EventKind::Delete && !keep_on_delete {
                    self.delete_all(trigger_id, &mut sent, &mut report).await;
                }
            }
            Some(edits) if edits.len() > sent.len() => {
                debug!(
                    "[{}] {} edit(s) for {} sent message(s), reposting",
                    trigger_id,
                    edits.len(),
                    sent.len()
                );
                self.delete_all(trigger_id, &mut sent, &mut report).await;
                posts.extend(edits.into_iter().map(PostContent::from));
            }
            Some(edits) => {
                self.delete_tail(trigger_id, &mut sent, edits.len(), &mut report).await;
                self.apply_edits(trigger_id, &mut sent, &edits, &mut report).await;
            }
        }

        self.send_posts(trigger_id, channel, &posts, &mut sent, &mut report).await;
        self.persist(trigger_id, sent).await;

        report
    }

    /// Delete every handle front to back
    async fn delete_all(
        &self,
        trigger_id: &str,
        sent: &mut Vec<MessageHandle>,
        report: &mut ReconcileReport,
    ) {
        let mut kept = Vec::new();
        for handle in sent.drain(..) {
            match self.transport.delete(&handle).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    warn!("[{}] Failed to delete {}: {}", trigger_id, handle, e);
                    report.failed += 1;
                    kept.push(handle);
                }
            }
        }
        *sent = kept;
    }

    /// Delete handles from the back until `keep` remain
    async fn delete_tail(
        &self,
        trigger_id: &str,
        sent: &mut Vec<MessageHandle>,
        keep: usize,
        report: &mut ReconcileReport,
    ) {
        for index in (keep..sent.len()).rev() {
            match self.transport.delete(&sent[index]).await {
                Ok(()) => {
                    sent.remove(index);
                    report.deleted += 1;
                }
                Err(e) => {
                    warn!("[{}] Failed to delete {}: {}", trigger_id, sent[index], e);
                    report.failed += 1;
                }
            }
        }
    }

    async fn apply_edits(
        &self,
        trigger_id: &str,
        sent: &mut [MessageHandle],
        edits: &[EditContent],
        report: &mut ReconcileReport,
    ) {
        for (index, edit) in edits.iter().enumerate() {
            match self.transport.edit(&sent[index], edit).await {
                Ok(handle) => {
                    sent[index] = handle;
                    report.edited += 1;
                }
                Err(e) => {
                    warn!("[{}] Failed to edit {}: {}", trigger_id, sent[index], e);
                    report.failed += 1;
                }
            }
        }
    }

    async fn send_posts(
        &self,
        trigger_id: &str,
        channel: &Channel,
        posts: &[PostContent],
        sent: &mut Vec<MessageHandle>,
        report: &mut ReconcileReport,
    ) {
        for post in posts {
            match self.transport.send(channel, post).await {
                Ok(handle) => {
                    sent.push(handle);
                    report.sent += 1;
                }
                Err(e) => {
                    warn!("[{}] Failed to send to channel {}: {}", trigger_id, channel.id, e);
                    report.failed += 1;
                }
            }
        }
    }

    async fn persist(&self, trigger_id: &str, sent: Vec<MessageHandle>) {
        if sent.is_empty() {
            self.ledger.delete(trigger_id).await;
        } else {
            self.ledger.set(trigger_id, sent).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::test_support::{handle, Op, RecordingTransport};
    use crate::domain::entities::{Channel, Guild};

    struct Fixture {
        transport: Arc<RecordingTransport>,
        ledger: Arc<SentMessageLedger>,
        reconciler: ResponseReconciler,
        channel: Channel,
    }

    fn fixture() -> Fixture {
        let transport = Arc::new(RecordingTransport::new());
        let ledger = Arc::new(SentMessageLedger::new());
        let reconciler = ResponseReconciler::new(transport.clone(), ledger.clone());
        Fixture {
            transport,
            ledger,
            reconciler,
            channel: Channel::text("c1", Guild::new("g1")),
        }
    }

    fn ids(handles: &[MessageHandle]) -> Vec<&str> {
        handles.iter().map(|h| h.id.as_str()).collect()
    }

    fn delete(id: &str) -> Op {
        Op::Delete { id: id.to_string() }
    }

    fn send(text: &str) -> Op {
        Op::Send { channel: "c1".to_string(), text: text.to_string() }
    }

    fn edit(id: &str, text: &str) -> Op {
        Op::Edit { id: id.to_string(), text: text.to_string() }
    }

    #[tokio::test]
    async fn test_pure_growth_sends_posts_in_order() {
        let f = fixture();
        let response = Response::post("P1").with_post("P2");

        let report = f
            .reconciler
            .reconcile(EventKind::Create, "t", &f.channel, Some(response))
            .await;

        assert_eq!(f.transport.ops(), vec![send("P1"), send("P2")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["s1", "s2"]);
        assert_eq!(report.sent, 2);
    }

    #[tokio::test]
    async fn test_edit_shrink_deletes_tail_first_then_edits() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1"), handle("m2"), handle("m3")]).await;

        let report = f
            .reconciler
            .reconcile(EventKind::Update, "t", &f.channel, Some(Response::edits(["E1"])))
            .await;

        assert_eq!(f.transport.ops(), vec![delete("m3"), delete("m2"), edit("m1", "E1")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1'"]);
        assert_eq!(report, ReconcileReport { sent: 0, edited: 1, deleted: 2, failed: 0 });
    }

    #[tokio::test]
    async fn test_edit_overflow_degrades_to_posts() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1")]).await;

        f.reconciler
            .reconcile(EventKind::Update, "t", &f.channel, Some(Response::edits(["E1", "E2"])))
            .await;

        assert_eq!(f.transport.ops(), vec![delete("m1"), send("E1"), send("E2")]);
        let ledger = f.ledger.get("t").await;
        assert_eq!(ids(&ledger), vec!["s1", "s2"]);
        assert!(!ledger.contains(&handle("m1")));
    }

    #[tokio::test]
    async fn test_overflow_edits_follow_explicit_posts() {
        let f = fixture();
        let response = Response::post("P").with_edit("E");

        f.reconciler.reconcile(EventKind::Update, "t", &f.channel, Some(response)).await;

        assert_eq!(f.transport.ops(), vec![send("P"), send("E")]);
    }

    #[tokio::test]
    async fn test_delete_without_response_clears_entry() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1"), handle("m2")]).await;

        f.reconciler.reconcile(EventKind::Delete, "t", &f.channel, None).await;

        assert_eq!(f.transport.ops(), vec![delete("m1"), delete("m2")]);
        assert!(f.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_without_response_clears_entry() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1")]).await;

        f.reconciler.reconcile(EventKind::Update, "t", &f.channel, None).await;

        assert_eq!(f.transport.ops(), vec![delete("m1")]);
        assert!(f.ledger.get("t").await.is_empty());
    }

    #[tokio::test]
    async fn test_create_without_response_is_noop() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1")]).await;

        let report = f.reconciler.reconcile(EventKind::Create, "t", &f.channel, None).await;

        assert!(report.is_noop());
        assert!(f.transport.ops().is_empty());
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_delete_with_posts_only_replaces_output() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1")]).await;

        f.reconciler
            .reconcile(EventKind::Delete, "t", &f.channel, Some(Response::post("gone")))
            .await;

        assert_eq!(f.transport.ops(), vec![delete("m1"), send("gone")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["s1"]);
    }

    #[tokio::test]
    async fn test_delete_with_keep_on_delete_leaves_output() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1")]).await;

        f.reconciler
            .reconcile(EventKind::Delete, "t", &f.channel, Some(Response::new().keep_on_delete()))
            .await;

        assert!(f.transport.ops().is_empty());
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_update_with_posts_only_keeps_previous_output() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1")]).await;

        f.reconciler
            .reconcile(EventKind::Update, "t", &f.channel, Some(Response::post("more")))
            .await;

        assert_eq!(f.transport.ops(), vec![send("more")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1", "s1"]);
    }

    #[tokio::test]
    async fn test_empty_edits_remove_all_output() {
        let f = fixture();
        f.ledger.set("t", vec![handle("m1"), handle("m2")]).await;

        f.reconciler
            .reconcile(
                EventKind::Update,
                "t",
                &f.channel,
                Some(Response::edits(Vec::<String>::new())),
            )
            .await;

        assert_eq!(f.transport.ops(), vec![delete("m2"), delete("m1")]);
        assert!(f.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_handle_and_continues() {
        let f = fixture();
        f.transport.fail_on("m1");
        f.ledger.set("t", vec![handle("m1"), handle("m2")]).await;

        let report = f.reconciler.reconcile(EventKind::Delete, "t", &f.channel, None).await;

        assert_eq!(f.transport.ops(), vec![delete("m1"), delete("m2")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1"]);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_overflow_keeps_handle_whose_delete_failed() {
        let f = fixture();
        f.transport.fail_on("m1");
        f.ledger.set("t", vec![handle("m1")]).await;

        let report = f
            .reconciler
            .reconcile(EventKind::Update, "t", &f.channel, Some(Response::edits(["E1", "E2"])))
            .await;

        assert_eq!(f.transport.ops(), vec![delete("m1"), send("E1"), send("E2")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1", "s1", "s2"]);
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_previous_handle() {
        let f = fixture();
        f.transport.fail_on("m1");
        f.ledger.set("t", vec![handle("m1"), handle("m2")]).await;

        f.reconciler
            .reconcile(EventKind::Update, "t", &f.channel, Some(Response::edits(["A", "B"])))
            .await;

        assert_eq!(f.transport.ops(), vec![edit("m1", "A"), edit("m2", "B")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1", "m2'"]);
    }

    #[tokio::test]
    async fn test_failed_tail_delete_stays_after_edited_prefix() {
        let f = fixture();
        f.transport.fail_on("m3");
        f.ledger.set("t", vec![handle("m1"), handle("m2"), handle("m3")]).await;

        f.reconciler
            .reconcile(EventKind::Update, "t", &f.channel, Some(Response::edits(["E1"])))
            .await;

        assert_eq!(f.transport.ops(), vec![delete("m3"), delete("m2"), edit("m1", "E1")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["m1'", "m3"]);
    }

    #[tokio::test]
    async fn test_failed_send_is_not_recorded() {
        let f = fixture();
        f.transport.fail_on("bad");

        let report = f
            .reconciler
            .reconcile(
                EventKind::Create,
                "t",
                &f.channel,
                Some(Response::post("bad").with_post("good")),
            )
            .await;

        assert_eq!(f.transport.ops(), vec![send("bad"), send("good")]);
        assert_eq!(ids(&f.ledger.get("t").await), vec!["s1"]);
        assert_eq!(report, ReconcileReport { sent: 1, edited: 0, deleted: 0, failed: 1 });
    }
}
