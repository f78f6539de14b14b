pub mod activity;
pub mod booking;
pub mod health;
pub mod notification;
pub mod operator_booking;
pub mod schedule;
