use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::api::extractors::auth::bearer_token;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, Span};

pub struct MaybeAuthUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        match app_state.session_service.verify(token) {
            Ok(user) => {
                Span::current().record("user_id", &user.id);
                Span::current().record("role", user.role.as_str());
                Ok(MaybeAuthUser(Some(user)))
            }
            Err(_) => {
                // Expired or foreign token: treat as anonymous
                debug!("MaybeAuth: ignoring invalid bearer token");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
