use crate::domain::models::{activity::Activity, user::User};
use crate::domain::ports::ActivityRepository;
use crate::error::AppError;

/// Loads an activity and checks the caller operates it.
pub async fn require_owned_activity(repo: &dyn ActivityRepository, operator: &User, activity_id: &str) -> Result<Activity, AppError> {
    let activity = repo.find_by_id(activity_id).await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    if !operator.is_operator() || activity.operator_id != operator.id {
        return Err(AppError::Forbidden("Activity belongs to another operator".into()));
    }
    Ok(activity)
}
