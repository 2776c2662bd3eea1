use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

pub mod health;
pub mod jobs;
pub mod metrics;

/// Two photographs per job; 20 MB covers both at full camera resolution.
const BODY_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// Local control surface: start a job, inspect the session, clear the log.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/api/v1/jobs", post(jobs::start_job))
        .route("/api/v1/session", get(jobs::get_session))
        .route("/api/v1/session/log", delete(jobs::clear_log))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
}
