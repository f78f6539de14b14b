pub mod availability;
pub mod booking_service;
pub mod catalog;
pub mod defaults;
pub mod dispatch;
pub mod lifecycle;
pub mod schedule_service;
pub mod session_service;
