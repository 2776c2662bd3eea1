use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::services::{runner::JobRunner, session::Session};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<JobRunner>,
    pub session: Arc<Session>,
    pub prometheus: Arc<PrometheusHandle>,
}

impl AppState {
    pub fn new(runner: JobRunner, prometheus: PrometheusHandle) -> Self {
        let session = Arc::clone(runner.session());
        Self {
            runner: Arc::new(runner),
            session,
            prometheus: Arc::new(prometheus),
        }
    }
}
