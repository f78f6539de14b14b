use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;
use crate::domain::models::{audit::AuditEntry, notification::Notification};

#[derive(Debug)]
pub enum SideEffect {
    Notify(Notification),
    Audit(AuditEntry),
}

pub type Outbox = UnboundedReceiver<SideEffect>;

/// Hands notification and audit records to the background worker.
///
/// Enqueueing never blocks and never fails the caller.
#[derive(Clone)]
pub struct Dispatcher {
    tx: UnboundedSender<SideEffect>,
}

impl Dispatcher {
    pub fn channel() -> (Self, Outbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, notification: Notification) {
        if let Err(e) = self.tx.send(SideEffect::Notify(notification)) {
            warn!("Dropping notification, worker is gone: {:?}", e.0);
        }
    }

    pub fn audit(&self, entry: AuditEntry) {
        if let Err(e) = self.tx.send(SideEffect::Audit(entry)) {
            warn!("Dropping audit entry, worker is gone: {:?}", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn effects_arrive_in_order() {
        let (dispatcher, mut outbox) = Dispatcher::channel();
        dispatcher.audit(AuditEntry::new(None, "create", "booking", "b1".into(), json!({})));
        dispatcher.notify(Notification::new("user", "u1".into(), "booking_confirmed", "t".into(), "m".into(), json!({})));

        assert!(matches!(outbox.recv().await, Some(SideEffect::Audit(_))));
        assert!(matches!(outbox.recv().await, Some(SideEffect::Notify(_))));
    }

    #[test]
    fn closed_outbox_does_not_panic() {
        let (dispatcher, outbox) = Dispatcher::channel();
        drop(outbox);
        dispatcher.audit(AuditEntry::new(Some("op".into()), "delete", "activity", "a1".into(), json!({})));
    }
}
