use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::identity::Identity;
use crate::error::AppError;
use std::sync::Arc;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use serde::{Deserialize, Serialize};
use tracing::{debug, Span};

/// Claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    pub aud: String,
    pub exp: usize,
}

pub struct AuthUser(pub Identity);

/// `Some(token)` when an `Authorization: Bearer` header is present.
pub(crate) fn bearer_token(parts: &Parts) -> Option<Result<&str, AppError>> {
    let value = parts.headers.get(header::AUTHORIZATION)?;
    Some(
        value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized),
    )
}

pub(crate) fn verify_token(token: &str, config: &Config) -> Result<Identity, AppError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.jwt_audience.as_str()]);

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized
    })?;

    let identity = Identity {
        user_id: token_data.claims.sub,
        email: token_data.claims.email,
    };
    Span::current().record("user_id", &identity.user_id);

    Ok(identity)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)??;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        verify_token(token, &app_state.config).map(AuthUser)
    }
}
