use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use timesheet::{Entries, HistoryFilter, TimesheetStatus, Week};
use tracing::instrument;

use super::{parse_optional_date, parse_status_filter, ApiError};
use crate::{
    adapters::inbound::http::{
        HistoryItemResponse, ReviewResponse, TimesheetResponse, WeekResponse,
    },
    app_state::AppState,
    auth::AuthUser,
    domain::models::{SaveTimesheetRequest, TimesheetId, UserId},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history))
        .route("/export.csv", get(export_history))
        .route("/week/:week_start", get(get_week).put(save_week))
        .route("/:id", delete(delete_draft))
        .route("/:id/reviews", get(reviews))
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    status: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

impl HistoryParams {
    fn to_filter(&self) -> Result<HistoryFilter, ApiError> {
        Ok(HistoryFilter {
            status: parse_status_filter(self.status.as_deref())?,
            from: parse_optional_date(self.from.as_deref())?,
            to: parse_optional_date(self.to.as_deref())?,
        })
    }
}

fn parse_week(week_start: &str) -> Result<Week, ApiError> {
    Week::parse(week_start).map_err(|e| ApiError::bad_request(e.to_string()))
}

#[instrument(name = "history", skip(user, app_state))]
async fn history(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryItemResponse>>, ApiError> {
    let records = app_state
        .timesheets
        .history(&user, params.to_filter()?)
        .await?;

    Ok(Json(records.into_iter().map(HistoryItemResponse::from).collect()))
}

#[instrument(name = "export_history", skip(user, app_state))]
async fn export_history(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = app_state
        .timesheets
        .export_history_csv(&user, params.to_filter()?)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"timesheet-history.csv\"",
            ),
        ],
        csv,
    ))
}

#[derive(Debug, Deserialize)]
struct WeekParams {
    /// Owner to look at; admins only.
    user: Option<String>,
}

#[instrument(name = "get_week", skip(user, app_state))]
async fn get_week(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(week_start): Path<String>,
    Query(params): Query<WeekParams>,
) -> Result<Json<WeekResponse>, ApiError> {
    let week = parse_week(&week_start)?;
    let owner = params.user.map(UserId::new);

    let view = app_state
        .timesheets
        .get_week(&user, owner.as_ref(), week)
        .await?;

    Ok(Json(view.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveWeekBody {
    #[serde(default)]
    entries: Entries,
    status: TimesheetStatus,
    expected_version: Option<i32>,
}

#[instrument(name = "save_week", skip(user, app_state, body))]
async fn save_week(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(week_start): Path<String>,
    Json(body): Json<SaveWeekBody>,
) -> Result<Json<TimesheetResponse>, ApiError> {
    let week = parse_week(&week_start)?;
    let mut request = SaveTimesheetRequest::new(week, body.entries, body.status);
    if let Some(version) = body.expected_version {
        request = request.with_expected_version(version);
    }

    let record = app_state.timesheets.save(&user, request).await?;
    Ok(Json(record.into()))
}

#[instrument(name = "delete_draft", skip(user, app_state))]
async fn delete_draft(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    app_state
        .timesheets
        .delete_draft(&user, TimesheetId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "reviews", skip(user, app_state))]
async fn reviews(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = app_state
        .timesheets
        .reviews(&user, TimesheetId::new(id))
        .await?;

    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}
