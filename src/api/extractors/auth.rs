use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

pub struct AuthUser(pub User);

/// Raw token from `Authorization: Bearer <token>`, if present.
pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts.headers.get(header::AUTHORIZATION)?
        .to_str().ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let user = app_state.session_service.verify(token)?;

        Span::current().record("user_id", &user.id);
        Span::current().record("role", user.role.as_str());

        Ok(AuthUser(user))
    }
}

/// An authenticated caller holding the operator role.
pub struct OperatorUser(pub User);

impl<S> FromRequestParts<S> for OperatorUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_operator() {
            return Err(AppError::Forbidden("Operator role required".into()));
        }
        Ok(OperatorUser(user))
    }
}
