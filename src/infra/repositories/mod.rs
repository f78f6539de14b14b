pub mod sqlite_activity_repo;
pub mod sqlite_schedule_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_notification_repo;
pub mod sqlite_audit_repo;

pub mod postgres_activity_repo;
pub mod postgres_schedule_repo;
pub mod postgres_booking_repo;
pub mod postgres_notification_repo;
pub mod postgres_audit_repo;
