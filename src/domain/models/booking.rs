use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};
use std::fmt;
use std::str::FromStr;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub reference: String,
    pub activity_id: String,
    pub operator_id: Option<String>,
    pub user_id: Option<String>,
    pub is_guest: bool,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub num_people: i32,
    pub price_per_person: f64,
    pub total_price: f64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub refusal_reason: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub activity_id: String,
    pub operator_id: Option<String>,
    pub user_id: Option<String>,
    pub is_guest: bool,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub booking_date: NaiveDate,
    pub time_slot: Option<String>,
    pub num_people: i32,
    pub price_per_person: f64,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let reference: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();

        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            reference,
            activity_id: params.activity_id,
            operator_id: params.operator_id,
            user_id: params.user_id,
            is_guest: params.is_guest,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            scheduled_at: params.scheduled_at,
            booking_date: params.booking_date,
            time_slot: params.time_slot,
            num_people: params.num_people,
            price_per_person: params.price_per_person,
            total_price: params.price_per_person * params.num_people as f64,
            status: params.status.as_str().to_string(),
            payment_status: params.payment_method.initial_payment_status().as_str().to_string(),
            payment_method: params.payment_method.as_str().to_string(),
            notes: params.notes,
            refusal_reason: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> Result<BookingStatus, AppError> {
        self.status.parse()
    }
}

/// Result of an admission attempt against the ledger.
#[derive(Debug)]
pub enum Admission {
    Admitted(Booking),
    Rejected { remaining: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Refused,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Refused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Refused => "refused",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Refused)
    }

    /// Whether a booking in this state still occupies seats.
    pub fn holds_capacity(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::Refused)
    }

    /// Quoted statuses that free their seats, for `status NOT IN (...)` filters.
    pub fn released_sql_list() -> String {
        Self::ALL
            .iter()
            .filter(|s| !s.holds_capacity())
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "refused" => Ok(BookingStatus::Refused),
            other => Err(AppError::Validation(format!("Invalid booking status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(AppError::Validation(format!("Invalid payment status '{}'", other))),
        }
    }
}

/// Payment is simulated; the method only decides the initial payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    Card,
    #[default]
    OnSite,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::OnSite => "on_site",
        }
    }

    pub fn initial_payment_status(&self) -> PaymentStatus {
        match self {
            PaymentMethod::Card => PaymentStatus::Paid,
            PaymentMethod::OnSite => PaymentStatus::Pending,
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "on_site" => Ok(PaymentMethod::OnSite),
            other => Err(AppError::Validation(format!("Invalid payment method '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancelled_and_refused_release_seats() {
        assert_eq!(BookingStatus::released_sql_list(), "'cancelled', 'refused'");
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!(BookingStatus::Completed.holds_capacity());
        assert!(BookingStatus::Pending.holds_capacity());
    }
}
