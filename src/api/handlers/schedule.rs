use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::OperatorUser;
use crate::api::dtos::requests::{BlockDateRequest, ReplaceWindowsRequest, SlotsQuery, UnblockDateRequest};
use crate::error::AppError;
use std::sync::Arc;

pub async fn get_available_days(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let days = state.schedule_service.list_available_days(&activity_id).await?;
    Ok(Json(days))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let day = state.schedule_service.list_slots_for_date(&activity_id, query.date).await?;
    Ok(Json(day))
}

pub async fn list_windows(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let windows = state.schedule_service.list_windows(&operator, &activity_id).await?;
    Ok(Json(windows))
}

pub async fn replace_windows(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
    Path(activity_id): Path<String>,
    Json(payload): Json<ReplaceWindowsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let windows = state.schedule_service.replace_windows(&operator, &activity_id, &payload.into_specs()).await?;
    Ok(Json(windows))
}

pub async fn block_date(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
    Path(activity_id): Path<String>,
    Json(payload): Json<BlockDateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blocked = state.schedule_service.block_date(&operator, &activity_id, payload.date, payload.reason).await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

pub async fn unblock_date(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
    Path(activity_id): Path<String>,
    Json(payload): Json<UnblockDateRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.schedule_service.unblock_date(&operator, &activity_id, payload.date).await?;
    Ok(StatusCode::NO_CONTENT)
}
