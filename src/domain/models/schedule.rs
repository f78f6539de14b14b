use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

/// `NaiveTime` on the wire as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::domain::services::availability::parse_slot_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub id: String,
    pub activity_id: String,
    pub day_of_week: i32,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityWindow {
    pub fn new(activity_id: String, day_of_week: i32, start_time: NaiveTime, end_time: NaiveTime, capacity: i32, is_active: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity_id,
            day_of_week,
            start_time,
            end_time,
            capacity,
            is_active,
            created_at: Utc::now(),
        }
    }

    /// The label bookings carry in `time_slot` for this window.
    pub fn slot_label(&self) -> String {
        self.start_time.format("%H:%M").to_string()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDate {
    pub id: String,
    pub activity_id: String,
    pub blocked_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BlockedDate {
    pub fn new(activity_id: String, blocked_date: NaiveDate, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity_id,
            blocked_date,
            reason,
            created_at: Utc::now(),
        }
    }
}

/// Seats held by live bookings under one slot label.
#[derive(Debug, FromRow, Clone, PartialEq, Eq)]
pub struct SlotUsage {
    pub time_slot: String,
    pub booked: i64,
}

/// A window projected onto a calendar date.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub booked: i64,
    pub remaining: i64,
    pub is_full: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    pub date: NaiveDate,
    pub blocked: bool,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDays {
    pub available_days: Vec<i32>,
    pub blocked_dates: Vec<NaiveDate>,
}

/// Capacity the admission write must respect, summed over the windows that open
/// at the requested slot.
#[derive(Debug, Clone)]
pub struct SlotGuard {
    pub window_ids: Vec<String>,
    pub capacity: i32,
}
