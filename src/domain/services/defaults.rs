use crate::domain::models::booking::BookingStatus;

pub const NEW_BOOKING_TITLE: &str = "New booking received";
pub const CONFIRMED_TITLE: &str = "Booking confirmed";
pub const REFUSED_TITLE: &str = "Booking refused";
pub const CANCELLED_TITLE: &str = "Booking cancelled";
pub const COMPLETED_TITLE: &str = "Thanks for joining us";

/// Operator-facing message for a freshly admitted booking.
pub fn new_booking_message(activity_title: &str, reference: &str, num_people: i32, date: &str, time_slot: Option<&str>) -> String {
    let when = match time_slot {
        Some(slot) => format!("{} at {}", date, slot),
        None => date.to_string(),
    };
    format!(
        "Booking {} for {} ({} {}) on {}.",
        reference,
        activity_title,
        num_people,
        if num_people == 1 { "person" } else { "people" },
        when
    )
}

/// Traveler-facing notification for a status change, if the status has one.
pub fn status_notification(status: BookingStatus, reference: &str, reason: Option<&str>) -> Option<(&'static str, &'static str, String)> {
    match status {
        BookingStatus::Confirmed => Some((
            "booking_confirmed",
            CONFIRMED_TITLE,
            format!("Your booking {} has been confirmed by the operator.", reference),
        )),
        BookingStatus::Refused => Some((
            "booking_refused",
            REFUSED_TITLE,
            format!(
                "Your booking {} was refused. Reason: {}",
                reference,
                reason.unwrap_or("no reason given")
            ),
        )),
        BookingStatus::Cancelled => Some((
            "booking_cancelled",
            CANCELLED_TITLE,
            match reason {
                Some(r) => format!("Your booking {} has been cancelled. Reason: {}", reference, r),
                None => format!("Your booking {} has been cancelled.", reference),
            },
        )),
        BookingStatus::Completed => Some((
            "booking_completed",
            COMPLETED_TITLE,
            format!("Booking {} is complete. We hope you enjoyed it!", reference),
        )),
        BookingStatus::Pending => None,
    }
}
