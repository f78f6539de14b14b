use std::sync::Arc;
use chrono::NaiveDate;
use serde_json::json;
use tracing::info;
use crate::domain::models::{
    audit::AuditEntry,
    schedule::{AvailabilityWindow, AvailableDays, BlockedDate, DaySlots},
    user::User,
};
use crate::domain::ports::{ActivityRepository, BookingRepository, ScheduleRepository};
use crate::domain::services::availability::{iso_weekday, parse_slot_label, project_slots};
use crate::domain::services::catalog::require_owned_activity;
use crate::domain::services::dispatch::Dispatcher;
use crate::error::AppError;

pub const DEFAULT_WINDOW_CAPACITY: i32 = 10;

/// One window as submitted by an operator; omitted fields take defaults.
#[derive(Debug, Clone)]
pub struct WindowSpec {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

pub fn build_window(activity_id: &str, spec: &WindowSpec) -> Result<AvailabilityWindow, AppError> {
    if !(1..=7).contains(&spec.day_of_week) {
        return Err(AppError::Validation(format!("dayOfWeek must be 1..7, got {}", spec.day_of_week)));
    }

    let start = parse_slot_label(&spec.start_time)
        .ok_or_else(|| AppError::Validation(format!("Invalid startTime '{}'", spec.start_time)))?;

    let end = match spec.end_time.as_deref() {
        Some(raw) => {
            let end = parse_slot_label(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid endTime '{}'", raw)))?;
            if end <= start {
                return Err(AppError::Validation("endTime must be after startTime".into()));
            }
            end
        }
        None => start,
    };

    let capacity = spec.capacity.unwrap_or(DEFAULT_WINDOW_CAPACITY);
    if capacity < 1 {
        return Err(AppError::Validation("capacity must be at least 1".into()));
    }

    Ok(AvailabilityWindow::new(
        activity_id.to_string(),
        spec.day_of_week,
        start,
        end,
        capacity,
        spec.is_active.unwrap_or(true),
    ))
}

pub struct ScheduleService {
    activity_repo: Arc<dyn ActivityRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    dispatcher: Dispatcher,
}

impl ScheduleService {
    pub fn new(
        activity_repo: Arc<dyn ActivityRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self { activity_repo, schedule_repo, booking_repo, dispatcher }
    }

    /// Bookable weekdays plus upcoming blocked dates. Unknown activities yield an empty result.
    pub async fn list_available_days(&self, activity_id: &str) -> Result<AvailableDays, AppError> {
        let Some(activity) = self.activity_repo.find_by_id(activity_id).await? else {
            return Ok(AvailableDays::default());
        };

        let available_days = self.schedule_repo.list_available_days(&activity.id).await?;
        let blocked_dates = self.schedule_repo.list_blocked_from(&activity.id, activity.today()).await?
            .into_iter()
            .map(|b| b.blocked_date)
            .collect();

        Ok(AvailableDays { available_days, blocked_dates })
    }

    /// Projects the weekday's windows onto `date` with live seat counts.
    pub async fn list_slots_for_date(&self, activity_id: &str, date: NaiveDate) -> Result<DaySlots, AppError> {
        if self.schedule_repo.is_blocked(activity_id, date).await? {
            return Ok(DaySlots { date, blocked: true, slots: Vec::new() });
        }

        let windows = self.schedule_repo.list_active_windows_for_day(activity_id, iso_weekday(date)).await?;
        if windows.is_empty() {
            return Ok(DaySlots { date, blocked: false, slots: Vec::new() });
        }

        let usage = self.booking_repo.usage_by_slot(activity_id, date).await?;
        Ok(DaySlots { date, blocked: false, slots: project_slots(&windows, &usage) })
    }

    pub async fn list_windows(&self, operator: &User, activity_id: &str) -> Result<Vec<AvailabilityWindow>, AppError> {
        let activity = require_owned_activity(self.activity_repo.as_ref(), operator, activity_id).await?;
        self.schedule_repo.list_windows(&activity.id).await
    }

    /// Replaces the full window set. Bookings against dropped windows stay valid
    /// but are no longer matched by any capacity check.
    pub async fn replace_windows(&self, operator: &User, activity_id: &str, specs: &[WindowSpec]) -> Result<Vec<AvailabilityWindow>, AppError> {
        let activity = require_owned_activity(self.activity_repo.as_ref(), operator, activity_id).await?;

        let windows = specs.iter()
            .map(|spec| build_window(&activity.id, spec))
            .collect::<Result<Vec<_>, _>>()?;

        let saved = self.schedule_repo.replace_windows(&activity.id, &windows).await?;
        info!("Replaced availability for activity {}: {} windows", activity.id, saved.len());

        self.dispatcher.audit(AuditEntry::new(
            Some(operator.id.clone()),
            "replace_windows",
            "activity",
            activity.id.clone(),
            json!({ "windows": saved }),
        ));
        Ok(saved)
    }

    pub async fn block_date(&self, operator: &User, activity_id: &str, date: NaiveDate, reason: Option<String>) -> Result<BlockedDate, AppError> {
        let activity = require_owned_activity(self.activity_repo.as_ref(), operator, activity_id).await?;

        let saved = self.schedule_repo.upsert_blocked_date(&BlockedDate::new(activity.id.clone(), date, reason)).await?;
        info!("Blocked {} for activity {}", date, activity.id);

        self.dispatcher.audit(AuditEntry::new(
            Some(operator.id.clone()),
            "block_date",
            "activity",
            activity.id,
            json!({ "blockedDate": date, "reason": saved.reason }),
        ));
        Ok(saved)
    }

    pub async fn unblock_date(&self, operator: &User, activity_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let activity = require_owned_activity(self.activity_repo.as_ref(), operator, activity_id).await?;

        self.schedule_repo.delete_blocked_date(&activity.id, date).await?;
        info!("Unblocked {} for activity {}", date, activity.id);

        self.dispatcher.audit(AuditEntry::new(
            Some(operator.id.clone()),
            "unblock_date",
            "activity",
            activity.id,
            json!({ "blockedDate": date }),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(day: i32, start: &str, end: Option<&str>, capacity: Option<i32>) -> WindowSpec {
        WindowSpec {
            day_of_week: day,
            start_time: start.into(),
            end_time: end.map(str::to_string),
            capacity,
            is_active: None,
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let w = build_window("a", &spec(3, "10:00", None, None)).unwrap();
        assert_eq!(w.capacity, DEFAULT_WINDOW_CAPACITY);
        assert!(w.is_active);
        assert_eq!(w.start_time, w.end_time);
    }

    #[test]
    fn invalid_windows_are_rejected() {
        assert!(build_window("a", &spec(0, "10:00", None, None)).is_err());
        assert!(build_window("a", &spec(8, "10:00", None, None)).is_err());
        assert!(build_window("a", &spec(1, "10:00", Some("09:00"), None)).is_err());
        assert!(build_window("a", &spec(1, "10:00", Some("10:00"), None)).is_err());
        assert!(build_window("a", &spec(1, "10:00", Some("11:00"), Some(0))).is_err());
        assert!(build_window("a", &spec(1, "ten", None, None)).is_err());
    }
}
