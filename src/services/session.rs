use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use uuid::Uuid;

use crate::models::job::RunState;
use crate::services::event_log::{EventLog, LogEntry};

#[derive(Debug, Default)]
struct SessionInner {
    run_state: RunState,
    job_id: Option<Uuid>,
    log: EventLog,
    result: Option<serde_json::Value>,
}

/// Shared job context: run state, event log and the latest result.
///
/// Every mutation goes through the accessors below; the lock is never held
/// across an await point.
#[derive(Debug, Default)]
pub struct Session {
    inner: Mutex<SessionInner>,
}

/// Point-in-time copy of the session, as exposed on the control surface.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub run_state: RunState,
    pub job_id: Option<Uuid>,
    pub result: Option<serde_json::Value>,
    pub logs: Vec<LogEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // Poisoning is ignored: the guarded state is plain data.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the session for a new job. Fails while another job is in flight.
    pub fn try_claim(&self) -> Result<Uuid, SessionError> {
        let mut inner = self.lock();
        if inner.run_state == RunState::InFlight {
            return Err(SessionError::Busy(inner.job_id));
        }
        let job_id = Uuid::new_v4();
        inner.run_state = RunState::InFlight;
        inner.job_id = Some(job_id);
        Ok(job_id)
    }

    pub fn mark_in_flight(&self) {
        self.lock().run_state = RunState::InFlight;
    }

    /// Release the session; the next job may be claimed.
    pub fn mark_idle(&self) {
        let mut inner = self.lock();
        inner.run_state = RunState::Idle;
        inner.job_id = None;
    }

    pub fn run_state(&self) -> RunState {
        self.lock().run_state
    }

    pub fn is_in_flight(&self) -> bool {
        self.run_state() == RunState::InFlight
    }

    pub fn log(&self, message: impl Into<String>) {
        self.lock().log.append(message);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().log.entries().to_vec()
    }

    /// Replace the stored result (latest wins).
    pub fn store_result(&self, result: serde_json::Value) {
        self.lock().result = Some(result);
    }

    pub fn clear_result(&self) {
        self.lock().result = None;
    }

    pub fn result(&self) -> Option<serde_json::Value> {
        self.lock().result.clone()
    }

    /// Empty the log and drop the stored result, whatever the run state.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.log.clear();
        inner.result = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            run_state: inner.run_state,
            job_id: inner.job_id,
            result: inner.result.clone(),
            logs: inner.log.entries().to_vec(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A job is already in flight")]
    Busy(Option<Uuid>),
}
