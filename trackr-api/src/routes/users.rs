use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use super::ApiError;
use crate::{
    adapters::inbound::http::UserResponse,
    app_state::AppState,
    auth::{AuthIdentity, AuthUser},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(me).put(update_me))
}

#[instrument(name = "me", skip(user))]
async fn me(user: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&*user))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileBody {
    email: String,
}

/// Creates the caller's profile on first sign-in, or updates its email.
#[instrument(name = "update_me", skip(identity, app_state))]
async fn update_me(
    identity: AuthIdentity,
    State(app_state): State<AppState>,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = body.email.trim();
    if !email.contains('@') {
        return Err(ApiError::bad_request("a valid email address is required"));
    }

    let user = app_state.users.upsert(&identity.0, email).await?;
    Ok(Json(user.into()))
}
