use std::sync::Arc;
use crate::domain::ports::{
    ActivityRepository, AuditRepository, BookingRepository, NotificationRepository, ScheduleRepository,
};
use crate::domain::services::{
    booking_service::BookingService, dispatch::Dispatcher, schedule_service::ScheduleService,
    session_service::SessionService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub audit_repo: Arc<dyn AuditRepository>,
    pub session_service: Arc<SessionService>,
    pub schedule_service: Arc<ScheduleService>,
    pub booking_service: Arc<BookingService>,
    pub dispatcher: Dispatcher,
}
