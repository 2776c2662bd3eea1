use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use sampras_scan::app_state::AppState;
use sampras_scan::config::AppConfig;
use sampras_scan::routes;
use sampras_scan::services::{
    delay::TokioDelay, recognition::SamprasClient, runner::JobRunner, session::Session,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing sampras-scan control surface");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    metrics::describe_counter!("scan_jobs_submitted_total", "Jobs that started an upload");
    metrics::describe_counter!(
        "scan_jobs_finished_total",
        "Jobs that reached a terminal outcome, by outcome"
    );
    metrics::describe_counter!("scan_poll_attempts_total", "Result requests issued");
    metrics::describe_histogram!(
        "scan_job_duration_seconds",
        "Time from upload start to terminal outcome"
    );
    metrics::describe_gauge!("scan_job_in_flight", "1 while a job owns the session");

    tracing::info!(api_url = %config.base_url(), "Initializing recognition API client");
    let client = SamprasClient::from_config(&config).expect("Failed to initialize API client");

    let runner = JobRunner::from_config(
        &config,
        Arc::new(Session::new()),
        Arc::new(client),
        Arc::new(TokioDelay),
    );
    let state = AppState::new(runner, prometheus_handle);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Control surface listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
