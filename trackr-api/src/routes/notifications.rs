use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::ApiError;
use crate::{
    adapters::inbound::http::NotificationResponse, app_state::AppState, auth::AuthUser,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}

#[instrument(name = "notifications", skip(user, app_state))]
async fn list(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = app_state.timesheets.notifications(&user).await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}
