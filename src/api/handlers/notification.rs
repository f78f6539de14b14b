use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use std::sync::Arc;

/// Operators read their operator inbox, travelers their user inbox.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let recipient_type = if user.is_operator() { "operator" } else { "user" };
    let notifications = state.notification_repo.list_for_recipient(recipient_type, &user.id).await?;
    Ok(Json(notifications))
}
