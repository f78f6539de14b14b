use std::sync::Arc;
use serde_json::json;
use tracing::{info, warn};
use crate::domain::models::{
    activity::{Activity, ActivityRef},
    audit::AuditEntry,
    booking::{Admission, Booking, BookingStatus, NewBookingParams, PaymentMethod},
    notification::Notification,
    schedule::SlotGuard,
    user::User,
};
use crate::domain::ports::{ActivityRepository, BookingRepository, ScheduleRepository};
use crate::domain::services::availability::{combined_capacity, iso_weekday, parse_slot_label, resolve_schedule, slot_label};
use crate::domain::services::defaults;
use crate::domain::services::dispatch::Dispatcher;
use crate::domain::services::lifecycle::{apply_change, StatusChange};
use crate::error::AppError;

/// A traveler's booking request after transport decoding.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub activity_id: String,
    pub scheduled_at: String,
    pub time_slot: Option<String>,
    pub num_people: Option<i32>,
    pub price_per_person: Option<f64>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub is_guest: bool,
}

pub struct BookingService {
    activity_repo: Arc<dyn ActivityRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    dispatcher: Dispatcher,
}

impl BookingService {
    pub fn new(
        activity_repo: Arc<dyn ActivityRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self { activity_repo, schedule_repo, booking_repo, dispatcher }
    }

    /// Admits a booking request.
    ///
    /// Catalog activities are checked against the windows opening at the requested
    /// slot; the check and the insert happen atomically in the ledger. Legacy ids
    /// skip every availability rule.
    pub async fn create_booking(&self, caller: Option<&User>, draft: BookingDraft) -> Result<Booking, AppError> {
        let user_id = match caller {
            Some(user) => Some(user.id.clone()),
            None if draft.is_guest => None,
            None => return Err(AppError::Unauthorized),
        };

        let num_people = draft.num_people.unwrap_or(1);
        if num_people < 1 {
            return Err(AppError::Validation("numPeople must be at least 1".into()));
        }
        if draft.customer_name.trim().is_empty() {
            return Err(AppError::Validation("customerName is required".into()));
        }
        if draft.price_per_person.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Err(AppError::Validation("pricePerPerson must be a non-negative number".into()));
        }

        let payment_method = match draft.payment_method.as_deref() {
            Some(raw) => raw.parse::<PaymentMethod>()?,
            None => PaymentMethod::default(),
        };
        let status = match draft.status.as_deref() {
            Some(raw) => match raw.parse::<BookingStatus>()? {
                s @ (BookingStatus::Pending | BookingStatus::Confirmed) => s,
                other => return Err(AppError::Validation(format!("A booking cannot be created as {}", other))),
            },
            None => BookingStatus::Confirmed,
        };
        let slot = match draft.time_slot.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_slot_label(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid timeSlot '{}', expected HH:MM", raw)))?),
            None => None,
        };

        let activity_ref = ActivityRef::parse(&draft.activity_id);
        let activity = match &activity_ref {
            ActivityRef::Catalog(id) => Some(
                self.activity_repo.find_by_id(&id.to_string()).await?
                    .ok_or(AppError::NotFound("Activity not found".into()))?
            ),
            ActivityRef::Legacy(raw) if raw.is_empty() => {
                return Err(AppError::Validation("activityId is required".into()));
            }
            ActivityRef::Legacy(_) => None,
        };
        if let Some(activity) = activity.as_ref().filter(|a| !a.is_bookable()) {
            return Err(AppError::Conflict(format!("Activity {} is not accepting bookings", activity.id)));
        }

        let tz = activity.as_ref().map(Activity::tz).unwrap_or(chrono_tz::UTC);
        let (scheduled_at, booking_date) = resolve_schedule(&draft.scheduled_at, slot, tz)?;

        let price_per_person = draft.price_per_person
            .or(activity.as_ref().map(|a| a.price_per_person))
            .unwrap_or(0.0);

        let booking = Booking::new(NewBookingParams {
            activity_id: activity_ref.key(),
            operator_id: activity.as_ref().map(|a| a.operator_id.clone()),
            user_id,
            is_guest: caller.is_none(),
            customer_name: draft.customer_name.trim().to_string(),
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            scheduled_at,
            booking_date,
            time_slot: slot.map(slot_label),
            num_people,
            price_per_person,
            status,
            payment_method,
            notes: draft.notes,
        });

        let created = match &activity {
            Some(activity) => {
                if self.schedule_repo.is_blocked(&activity.id, booking_date).await? {
                    return Err(AppError::DateBlocked(booking_date));
                }

                let windows = match slot {
                    Some(start) => self.schedule_repo
                        .find_active_windows(&activity.id, iso_weekday(booking_date), start)
                        .await?,
                    None => Vec::new(),
                };

                if windows.is_empty() {
                    info!("No matching window for {} on {} {:?}, admitting without capacity check", activity.id, booking_date, booking.time_slot);
                    self.booking_repo.create(&booking).await?
                } else {
                    let guard = SlotGuard {
                        window_ids: windows.iter().map(|w| w.id.clone()).collect(),
                        capacity: combined_capacity(&windows),
                    };
                    match self.booking_repo.admit(&booking, &guard).await? {
                        Admission::Admitted(b) => b,
                        Admission::Rejected { remaining } => {
                            warn!(
                                "Booking rejected: {} seats requested for {} {} {:?}, {} remaining",
                                num_people, activity.id, booking_date, booking.time_slot, remaining
                            );
                            return Err(AppError::capacity(remaining, num_people));
                        }
                    }
                }
            }
            None => {
                info!("Legacy activity '{}', admitting without capacity check", booking.activity_id);
                self.booking_repo.create(&booking).await?
            }
        };

        info!("Booking created: {} ({}) for activity {}", created.id, created.reference, created.activity_id);

        self.dispatcher.audit(AuditEntry::new(
            created.user_id.clone(),
            "create",
            "booking",
            created.id.clone(),
            json!({ "after": created }),
        ));

        if let (Some(activity), Some(operator_id)) = (&activity, &created.operator_id) {
            self.dispatcher.notify(Notification::new(
                "operator",
                operator_id.clone(),
                "new_booking",
                defaults::NEW_BOOKING_TITLE.to_string(),
                defaults::new_booking_message(
                    &activity.title,
                    &created.reference,
                    created.num_people,
                    &created.booking_date.to_string(),
                    created.time_slot.as_deref(),
                ),
                json!({ "bookingId": created.id, "activityId": activity.id }),
            ));
        }

        Ok(created)
    }

    /// Operator-side status/payment/notes update.
    pub async fn update_status(&self, operator: &User, booking_id: &str, change: StatusChange) -> Result<Booking, AppError> {
        let booking = self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        if !operator.is_operator() || booking.operator_id.as_deref() != Some(operator.id.as_str()) {
            return Err(AppError::Forbidden("Booking belongs to another operator".into()));
        }

        let (next, moved_to) = apply_change(&booking, &change)?;
        let saved = self.booking_repo.update_lifecycle(&next).await?;
        info!("Booking {} updated: status {} -> {}, payment {}", saved.id, booking.status, saved.status, saved.payment_status);

        self.dispatcher.audit(AuditEntry::new(
            Some(operator.id.clone()),
            "update_status",
            "booking",
            saved.id.clone(),
            json!({
                "before": { "status": booking.status, "paymentStatus": booking.payment_status, "notes": booking.notes },
                "after": { "status": saved.status, "paymentStatus": saved.payment_status, "notes": saved.notes },
                "reason": change.reason,
            }),
        ));

        if let Some(status) = moved_to
            && let Some(user_id) = &saved.user_id
            && let Some((kind, title, message)) = defaults::status_notification(status, &saved.reference, change.reason.as_deref())
        {
            self.dispatcher.notify(Notification::new(
                "user",
                user_id.clone(),
                kind,
                title.to_string(),
                message,
                json!({ "bookingId": saved.id, "status": saved.status }),
            ));
        }

        Ok(saved)
    }

    /// A booking is visible to its traveler and to its operator.
    pub async fn get_for(&self, caller: &User, booking_id: &str) -> Result<Booking, AppError> {
        let booking = self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        let is_owner = booking.user_id.as_deref() == Some(caller.id.as_str());
        let is_operator = caller.is_operator() && booking.operator_id.as_deref() == Some(caller.id.as_str());
        if !is_owner && !is_operator {
            return Err(AppError::NotFound("Booking not found".into()));
        }
        Ok(booking)
    }
}
