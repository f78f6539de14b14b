use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::OperatorUser;
use crate::api::dtos::requests::CreateActivityRequest;
use crate::domain::models::{activity::Activity, audit::AuditEntry};
use crate::domain::services::catalog::require_owned_activity;
use crate::error::AppError;
use std::sync::Arc;
use chrono_tz::Tz;
use serde_json::json;
use tracing::info;

pub const DEFAULT_MAX_PEOPLE: i32 = 10;

pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    if !payload.price_per_person.is_finite() || payload.price_per_person < 0.0 {
        return Err(AppError::Validation("pricePerPerson must be a non-negative number".into()));
    }
    let max_people = payload.max_people.unwrap_or(DEFAULT_MAX_PEOPLE);
    if max_people < 1 {
        return Err(AppError::Validation("maxPeople must be at least 1".into()));
    }
    let timezone = payload.timezone.unwrap_or_else(|| "UTC".to_string());
    if timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation(format!("Unknown timezone '{}'", timezone)));
    }

    let activity = Activity::new(operator.id.clone(), title.to_string(), payload.price_per_person, max_people, timezone);
    let created = state.activity_repo.create(&activity).await?;
    info!("Activity created: {} by operator {}", created.id, operator.id);

    state.dispatcher.audit(AuditEntry::new(
        Some(operator.id),
        "create",
        "activity",
        created.id.clone(),
        json!({ "after": created }),
    ));

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state.activity_repo.find_by_id(&activity_id).await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;
    Ok(Json(activity))
}

pub async fn list_my_activities(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
) -> Result<impl IntoResponse, AppError> {
    let activities = state.activity_repo.list_by_operator(&operator.id).await?;
    Ok(Json(activities))
}

pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    OperatorUser(operator): OperatorUser,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let activity = require_owned_activity(state.activity_repo.as_ref(), &operator, &activity_id).await?;

    state.activity_repo.delete(&activity.id).await?;
    info!("Activity deleted: {}", activity.id);

    state.dispatcher.audit(AuditEntry::new(
        Some(operator.id),
        "delete",
        "activity",
        activity.id.clone(),
        json!({ "before": activity }),
    ));

    Ok(StatusCode::NO_CONTENT)
}
