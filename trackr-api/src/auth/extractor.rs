use std::ops::Deref;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{
    app_state::AppState,
    domain::models::{Actor, UserId},
    routes::ApiError,
};

/// The verified user id from the identity header, whether or not a profile
/// exists for it yet. Returns 401 Unauthorized if the header is missing.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(&state.user_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| AuthIdentity(UserId::new(value)))
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

/// A custom Axum extractor that resolves the caller to an [`Actor`] with a
/// stored profile. Returns 401 Unauthorized if there is no identity or the
/// user is unknown.
#[derive(Debug, Clone)]
pub struct AuthUser {
    actor: Actor,
}

impl Deref for AuthUser {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.actor
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthIdentity(user_id) = AuthIdentity::from_request_parts(parts, state).await?;

        let user = state
            .users
            .get(&user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Unknown user"))?;

        Ok(AuthUser { actor: user.into() })
    }
}
