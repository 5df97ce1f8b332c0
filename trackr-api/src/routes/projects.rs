use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::ApiError;
use crate::{adapters::inbound::http::ProjectResponse, app_state::AppState, auth::AuthUser};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}

#[instrument(name = "projects", skip(_user, app_state))]
async fn list(
    _user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = app_state.timesheets.projects().await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}
