use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::OperatorUser;
use crate::api::dtos::requests::UpdateBookingStatusRequest;
use crate::api::dtos::responses::BookingResponse;
use crate::domain::services::lifecycle::StatusChange;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_operator_bookings(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_operator(&operator.id).await?;
    Ok(Json(bookings))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let change = StatusChange::try_from(payload)?;
    let booking = state.booking_service.update_status(&operator, &booking_id, change).await?;
    Ok(Json(BookingResponse { booking }))
}
