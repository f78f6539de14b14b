use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub operator_id: String,
    pub title: String,
    pub price_per_person: f64,
    pub max_people: i32,
    pub status: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(operator_id: String, title: String, price_per_person: f64, max_people: i32, timezone: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operator_id,
            title,
            price_per_person,
            max_people,
            status: "active".to_string(),
            timezone,
            created_at: Utc::now(),
        }
    }

    /// Only active catalog entries take new bookings.
    pub fn is_bookable(&self) -> bool {
        self.status == "active"
    }

    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }

    /// Calendar date "now" in the activity's own zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz()).date_naive()
    }
}

/// How a booking request names its activity.
///
/// Catalog ids are UUIDs and get capacity enforcement. Anything else is a
/// legacy/off-catalog target that is stored verbatim and never checked
/// against availability windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRef {
    Catalog(Uuid),
    Legacy(String),
}

impl ActivityRef {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match Uuid::parse_str(trimmed) {
            Ok(id) => ActivityRef::Catalog(id),
            Err(_) => ActivityRef::Legacy(trimmed.to_string()),
        }
    }

    pub fn key(&self) -> String {
        match self {
            ActivityRef::Catalog(id) => id.to_string(),
            ActivityRef::Legacy(raw) => raw.clone(),
        }
    }

}
