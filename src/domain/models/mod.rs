pub mod activity;
pub mod audit;
pub mod auth;
pub mod booking;
pub mod notification;
pub mod schedule;
pub mod user;
