use chrono::NaiveDate;
use serde::Deserialize;
use crate::domain::models::booking::{BookingStatus, PaymentStatus};
use crate::domain::services::booking_service::BookingDraft;
use crate::domain::services::lifecycle::StatusChange;
use crate::error::AppError;
use crate::domain::services::schedule_service::WindowSpec;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub title: String,
    pub price_per_person: f64,
    pub max_people: Option<i32>,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRequest {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<WindowRequest> for WindowSpec {
    fn from(r: WindowRequest) -> Self {
        WindowSpec {
            day_of_week: r.day_of_week,
            start_time: r.start_time,
            end_time: r.end_time,
            capacity: r.capacity,
            is_active: r.is_active,
        }
    }
}

/// Accepts either a bare array or `{ "slots": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ReplaceWindowsRequest {
    List(Vec<WindowRequest>),
    Wrapped { slots: Vec<WindowRequest> },
}

impl ReplaceWindowsRequest {
    pub fn into_specs(self) -> Vec<WindowSpec> {
        let list = match self {
            ReplaceWindowsRequest::List(l) => l,
            ReplaceWindowsRequest::Wrapped { slots } => slots,
        };
        list.into_iter().map(WindowSpec::from).collect()
    }
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct BlockDateRequest {
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct UnblockDateRequest {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
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
    #[serde(default)]
    pub is_guest: bool,
}

impl From<CreateBookingRequest> for BookingDraft {
    fn from(r: CreateBookingRequest) -> Self {
        BookingDraft {
            activity_id: r.activity_id,
            scheduled_at: r.scheduled_at,
            time_slot: r.time_slot,
            num_people: r.num_people,
            price_per_person: r.price_per_person,
            customer_name: r.customer_name,
            customer_email: r.customer_email,
            customer_phone: r.customer_phone,
            payment_method: r.payment_method,
            status: r.status,
            notes: r.notes,
            is_guest: r.is_guest,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: Option<String>,
    pub reason: Option<String>,
    pub payment_status: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<UpdateBookingStatusRequest> for StatusChange {
    type Error = AppError;

    fn try_from(r: UpdateBookingStatusRequest) -> Result<Self, Self::Error> {
        Ok(StatusChange {
            status: r.status.as_deref().map(str::parse::<BookingStatus>).transpose()?,
            reason: r.reason,
            payment_status: r.payment_status.as_deref().map(str::parse::<PaymentStatus>).transpose()?,
            notes: r.notes,
        })
    }
}
