use axum::extract::State;
use axum::response::IntoResponse;

use crate::app_state::AppState;

/// Prometheus scrape endpoint.
/// Refreshes the in-flight gauge, then renders the text exposition format.
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let in_flight = if state.session.is_in_flight() { 1.0 } else { 0.0 };
    metrics::gauge!("scan_job_in_flight").set(in_flight);
    state.prometheus.render()
}
