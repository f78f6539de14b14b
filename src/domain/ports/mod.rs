use crate::domain::models::{
    activity::Activity,
    audit::AuditEntry,
    booking::{Admission, Booking},
    notification::Notification,
    schedule::{AvailabilityWindow, BlockedDate, SlotGuard, SlotUsage},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn create(&self, activity: &Activity) -> Result<Activity, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>, AppError>;
    async fn list_by_operator(&self, operator_id: &str) -> Result<Vec<Activity>, AppError>;
    /// Removes the activity together with its windows and blocked dates.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn list_windows(&self, activity_id: &str) -> Result<Vec<AvailabilityWindow>, AppError>;
    async fn list_active_windows_for_day(&self, activity_id: &str, day_of_week: i32) -> Result<Vec<AvailabilityWindow>, AppError>;
    async fn find_active_windows(&self, activity_id: &str, day_of_week: i32, start_time: NaiveTime) -> Result<Vec<AvailabilityWindow>, AppError>;
    async fn list_available_days(&self, activity_id: &str) -> Result<Vec<i32>, AppError>;
    async fn replace_windows(&self, activity_id: &str, windows: &[AvailabilityWindow]) -> Result<Vec<AvailabilityWindow>, AppError>;

    async fn upsert_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError>;
    async fn delete_blocked_date(&self, activity_id: &str, date: NaiveDate) -> Result<(), AppError>;
    async fn is_blocked(&self, activity_id: &str, date: NaiveDate) -> Result<bool, AppError>;
    async fn list_blocked_from(&self, activity_id: &str, from: NaiveDate) -> Result<Vec<BlockedDate>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts without any capacity check.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Checks remaining seats under `guard` and inserts as one atomic unit.
    async fn admit(&self, booking: &Booking, guard: &SlotGuard) -> Result<Admission, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_operator(&self, operator_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn usage_by_slot(&self, activity_id: &str, date: NaiveDate) -> Result<Vec<SlotUsage>, AppError>;
    async fn booked_seats(&self, activity_id: &str, date: NaiveDate, time_slot: &str) -> Result<i64, AppError>;
    async fn update_lifecycle(&self, booking: &Booking) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<(), AppError>;
    async fn list_for_recipient(&self, recipient_type: &str, recipient_id: &str) -> Result<Vec<Notification>, AppError>;
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<(), AppError>;
}
