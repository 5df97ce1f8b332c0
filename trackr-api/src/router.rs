use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, config::Settings, routes};

pub fn create(app_state: AppState, config: &Settings) -> Router<()> {
    let app_url = config.application.app_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, app_state.user_header.clone()])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().unwrap_or_default() == app_url
        }));

    api()
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

fn api() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .nest("/me", routes::users::router())
        .nest("/projects", routes::projects::router())
        .nest("/dashboard", routes::dashboard::router())
        .nest("/notifications", routes::notifications::router())
        .nest("/timesheets", routes::timesheets::router())
        .nest("/admin", routes::admin::router())
}
