use serde::Serialize;
use crate::domain::models::booking::Booking;

#[derive(Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
}
