use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::ApiError;
use crate::{adapters::inbound::http::DashboardResponse, app_state::AppState, auth::AuthUser};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

#[instrument(name = "dashboard", skip(user, app_state))]
async fn dashboard(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dashboard = app_state.timesheets.dashboard(&user).await?;
    Ok(Json(dashboard.into()))
}
