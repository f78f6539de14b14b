use chrono::Utc;
use crate::domain::models::booking::{Booking, BookingStatus, PaymentStatus};
use crate::error::AppError;

#[derive(Debug, Default, Clone)]
pub struct StatusChange {
    pub status: Option<BookingStatus>,
    pub reason: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

/// Applies an operator change to a booking.
///
/// Returns the updated booking and the new status when the status actually moved.
/// Payment status and notes are independent of the state machine and may be
/// edited on any booking.
pub fn apply_change(booking: &Booking, change: &StatusChange) -> Result<(Booking, Option<BookingStatus>), AppError> {
    let current = booking.status()?;
    let mut updated = booking.clone();
    let mut moved_to = None;

    if let Some(target) = change.status {
        if current.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Booking is already {} and cannot move to {}", current, target
            )));
        }
        if target == BookingStatus::Pending && current != BookingStatus::Pending {
            return Err(AppError::Conflict(format!("Booking cannot return to pending from {}", current)));
        }

        let reason = change.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
        match target {
            BookingStatus::Refused => {
                let reason = reason.ok_or(AppError::Validation("A reason is required to refuse a booking".into()))?;
                updated.refusal_reason = Some(reason.to_string());
            }
            BookingStatus::Cancelled => {
                updated.cancellation_reason = reason.map(str::to_string);
            }
            _ => {}
        }

        if target != current {
            updated.status = target.as_str().to_string();
            moved_to = Some(target);
        }
    }

    if let Some(payment) = change.payment_status {
        updated.payment_status = payment.as_str().to_string();
    }
    if let Some(notes) = &change.notes {
        updated.notes = Some(notes.clone());
    }

    updated.updated_at = Utc::now();
    Ok((updated, moved_to))
}
