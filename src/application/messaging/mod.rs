//! Message handling - Event dispatch and output reconciliation

pub mod dispatcher;
pub mod ledger;
pub mod reconciler;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::EventDispatcher;
pub use ledger::{SentMessageLedger, TriggerGuard};
pub use reconciler::{ReconcileReport, ResponseReconciler};
pub use runner::run_event_loop;
