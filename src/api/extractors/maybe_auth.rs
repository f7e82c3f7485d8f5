use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::api::extractors::auth::{bearer_token, verify_token};
use crate::state::AppState;
use crate::domain::models::identity::Identity;
use crate::error::AppError;
use std::sync::Arc;

/// Caller identity when a bearer token is sent. A token that is present but
/// invalid is still rejected; only its absence means "guest".
pub struct MaybeAuthUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        verify_token(token?, &app_state.config).map(|identity| MaybeAuthUser(Some(identity)))
    }
}
