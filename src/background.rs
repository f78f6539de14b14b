use std::sync::Arc;
use tracing::{error, info, debug, info_span, Instrument};
use crate::domain::ports::{AuditRepository, NotificationRepository};
use crate::domain::services::dispatch::{Outbox, SideEffect};
use crate::error::AppError;

/// Drains the dispatcher outbox until every sender is dropped.
///
/// The worker holds only the two sinks it writes to, so the outbox closes once
/// the app state and its services are gone. Failures are logged and never reach
/// the request that produced the effect.
pub async fn start_side_effect_worker(
    notification_repo: Arc<dyn NotificationRepository>,
    audit_repo: Arc<dyn AuditRepository>,
    mut outbox: Outbox,
) {
    info!("Starting side-effect worker...");

    while let Some(effect) = outbox.recv().await {
        let span = match &effect {
            SideEffect::Notify(n) => info_span!("side_effect", kind = "notify", id = %n.id, recipient = %n.recipient_id),
            SideEffect::Audit(a) => info_span!("side_effect", kind = "audit", id = %a.id, entity = %a.entity_id),
        };

        async {
            match process_effect(notification_repo.as_ref(), audit_repo.as_ref(), &effect).await {
                Ok(_) => debug!("Side effect stored"),
                Err(e) => error!("Side effect failed: {:?}", e),
            }
        }
            .instrument(span)
            .await;
    }

    info!("Side-effect worker stopped: outbox closed");
}

async fn process_effect(
    notification_repo: &dyn NotificationRepository,
    audit_repo: &dyn AuditRepository,
    effect: &SideEffect,
) -> Result<(), AppError> {
    match effect {
        SideEffect::Notify(notification) => notification_repo.create(notification).await,
        SideEffect::Audit(entry) => audit_repo.record(entry).await,
    }
}
