use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;
use crate::models::job::RunState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub run_state: RunState,
    pub log_entries: usize,
}

/// GET /health — liveness plus the current job state.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.session.snapshot();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        run_state: snapshot.run_state,
        log_entries: snapshot.logs.len(),
    })
}
