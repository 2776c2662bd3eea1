use serde::Serialize;
use uuid::Uuid;

use super::job::RunState;
use crate::services::session::SessionSnapshot;

/// Response after starting a job.
#[derive(Debug, Serialize)]
pub struct StartJobResponse {
    pub job_id: Uuid,
    pub status: RunState,
    pub receipt_kb: u64,
    pub slip_kb: u64,
    pub message: String,
}

/// One rendered event-log line.
#[derive(Debug, Serialize)]
pub struct LogLine {
    pub time: String,
    pub message: String,
}

/// Response for querying the session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub run_state: RunState,
    pub job_id: Option<Uuid>,
    pub result: Option<serde_json::Value>,
    /// Insertion order, oldest first.
    pub logs: Vec<LogLine>,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            run_state: snapshot.run_state,
            job_id: snapshot.job_id,
            result: snapshot.result,
            logs: snapshot
                .logs
                .into_iter()
                .map(|entry| LogLine {
                    time: entry.formatted_time(),
                    message: entry.message,
                })
                .collect(),
        }
    }
}

/// Error body for rejected control-surface requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
