use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::{stream, Stream};
use serde::Deserialize;
use timesheet::{ReviewAction, Summary};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::instrument;

use super::{parse_status_filter, ApiError};
use crate::{
    adapters::inbound::http::{AdminOverviewResponse, TimesheetResponse},
    app_state::AppState,
    auth::AuthUser,
    domain::{
        models::{Actor, AdminQuery, ReviewRequest, TimesheetEvent, TimesheetId},
        ports::inbound::TimesheetService,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timesheets", get(overview))
        .route("/timesheets/:id/review", post(review))
        .route("/summary/stream", get(summary_stream))
}

#[derive(Debug, Deserialize)]
struct OverviewParams {
    status: Option<String>,
    search: Option<String>,
}

#[instrument(name = "admin_overview", skip(user, app_state))]
async fn overview(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> Result<Json<AdminOverviewResponse>, ApiError> {
    let query = AdminQuery {
        status: parse_status_filter(params.status.as_deref())?,
        search: params.search,
    };

    let overview = app_state.timesheets.admin_overview(&user, query).await?;
    Ok(Json(overview.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    action: ReviewAction,
    comment: Option<String>,
    expected_version: Option<i32>,
}

#[instrument(name = "review", skip(user, app_state))]
async fn review(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<TimesheetResponse>, ApiError> {
    let request = ReviewRequest {
        id: TimesheetId::new(id),
        action: body.action,
        comment: body.comment,
        expected_version: body.expected_version,
    };

    let record = app_state.timesheets.review(&user, request).await?;
    Ok(Json(record.into()))
}

struct SummaryFeed {
    service: Arc<dyn TimesheetService>,
    actor: Actor,
    events: Receiver<TimesheetEvent>,
    pending: Option<Summary>,
}

fn summary_event(summary: &Summary) -> Event {
    Event::default()
        .event("summary")
        .json_data(summary)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to serialize summary: {:?}", e);
            Event::default().comment("summary unavailable")
        })
}

/// Pushes the admin summary once on connect and again after every change.
#[instrument(name = "summary_stream", skip(user, app_state))]
async fn summary_stream(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // subscribe first so no change between the read and the subscription is lost
    let events = app_state.timesheets.subscribe();
    let initial = app_state.timesheets.summary(&user).await?;

    let feed = SummaryFeed {
        service: app_state.timesheets.clone(),
        actor: (*user).clone(),
        events,
        pending: Some(initial),
    };

    let stream = stream::unfold(feed, |mut feed| async move {
        if let Some(summary) = feed.pending.take() {
            return Some((Ok(summary_event(&summary)), feed));
        }

        loop {
            match feed.events.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    match feed.service.summary(&feed.actor).await {
                        Ok(summary) => return Some((Ok(summary_event(&summary)), feed)),
                        Err(e) => tracing::error!("Failed to refresh summary: {:?}", e),
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
