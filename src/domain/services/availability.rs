use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use crate::domain::models::schedule::{AvailabilityWindow, SlotUsage, SlotView};
use crate::error::AppError;

/// ISO weekday number, Monday = 1 through Sunday = 7.
pub fn iso_weekday(date: NaiveDate) -> i32 {
    date.weekday().number_from_monday() as i32
}

/// Parses `HH:MM` or `HH:MM:SS`, dropping seconds.
pub fn parse_slot_label(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()?;
    parsed.with_second(0)?.with_nanosecond(0)
}

pub fn slot_label(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Projects the day's windows onto slots keyed by start label.
///
/// Windows that share a start label form a single slot: their capacities add up,
/// the latest end time wins and the first window lends its id. Admission checks
/// against the same summed capacity, see [`combined_capacity`].
pub fn project_slots(windows: &[AvailabilityWindow], usage: &[SlotUsage]) -> Vec<SlotView> {
    let booked_by_label: HashMap<&str, i64> = usage
        .iter()
        .map(|u| (u.time_slot.as_str(), u.booked))
        .collect();

    let mut slots: Vec<SlotView> = Vec::with_capacity(windows.len());
    for window in windows {
        let label = window.slot_label();
        match slots.iter_mut().find(|s| s.start_time == label) {
            Some(slot) => {
                slot.capacity += window.capacity;
                let end = slot_label(window.end_time);
                if end > slot.end_time {
                    slot.end_time = end;
                }
            }
            None => slots.push(SlotView {
                id: window.id.clone(),
                start_time: label,
                end_time: slot_label(window.end_time),
                capacity: window.capacity,
                booked: 0,
                remaining: 0,
                is_full: false,
            }),
        }
    }

    for slot in &mut slots {
        slot.booked = booked_by_label.get(slot.start_time.as_str()).copied().unwrap_or(0);
        slot.remaining = (slot.capacity as i64 - slot.booked).max(0);
        slot.is_full = slot.remaining <= 0;
    }
    slots
}

/// Seats offered by every window that opens at the same start label.
pub fn combined_capacity(windows: &[AvailabilityWindow]) -> i32 {
    windows.iter().map(|w| w.capacity).sum()
}

/// Resolves a requested `scheduledAt` into an instant and the bookable calendar date.
///
/// Offset timestamps are taken as-is and dated in `tz`. Local timestamps and bare
/// dates are read as wall-clock time in `tz`; a bare date takes its time of day
/// from `time_slot` when one is given. A repeated wall-clock time resolves to its
/// earlier instant and a skipped one is rejected.
pub fn resolve_schedule(raw: &str, time_slot: Option<NaiveTime>, tz: Tz) -> Result<(DateTime<Utc>, NaiveDate), AppError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let utc = dt.with_timezone(&Utc);
        return Ok((utc, utc.with_timezone(&tz).date_naive()));
    }

    let local = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(time_slot.unwrap_or(NaiveTime::MIN)))
        })
        .ok_or_else(|| AppError::Validation(format!("Invalid scheduledAt '{}'", raw)))?;

    // Fall-back nights repeat an hour: take its first occurrence.
    let instant = tz.from_local_datetime(&local)
        .earliest()
        .ok_or(AppError::Validation("Invalid local time (skipped due to DST)".into()))?
        .with_timezone(&Utc);

    Ok((instant, local.date()))
}

/// Decides whether `requested` seats fit. Returns the seats left afterwards.
pub fn check_admission(capacity: i32, booked: i64, requested: i32) -> Result<i64, AppError> {
    let remaining = (capacity as i64 - booked).max(0);
    if requested as i64 > remaining {
        return Err(AppError::capacity(remaining, requested));
    }
    Ok(remaining - requested as i64)
}
