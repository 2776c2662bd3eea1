use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::job::{JobOutcome, JobRequest};
use crate::services::delay::Delay;
use crate::services::poller::{PollPolicy, Poller};
use crate::services::recognition::RecognitionApi;
use crate::services::session::{Session, SessionError};
use crate::services::submission::Submitter;

/// Runs jobs end to end: upload, then poll with the returned token.
///
/// At most one job owns the session at a time; a second job is rejected
/// with [`SessionError::Busy`] before anything is logged or sent.
pub struct JobRunner {
    session: Arc<Session>,
    submitter: Submitter,
    poller: Poller,
}

impl JobRunner {
    pub fn new(
        session: Arc<Session>,
        api: Arc<dyn RecognitionApi>,
        delay: Arc<dyn Delay>,
        custom_id: impl Into<String>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            session,
            submitter: Submitter::new(api.clone(), custom_id),
            poller: Poller::new(api, delay, policy),
        }
    }

    pub fn from_config(
        config: &AppConfig,
        session: Arc<Session>,
        api: Arc<dyn RecognitionApi>,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self::new(session, api, delay, config.custom_id.clone(), config.poll_policy())
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Claim the session and run one job to its terminal outcome.
    pub async fn run(&self, job: JobRequest) -> Result<JobOutcome, SessionError> {
        let job_id = self.session.try_claim()?;
        Ok(self.run_claimed(job_id, job).await)
    }

    /// Claim the session now and run the job on a background task.
    pub fn start(self: &Arc<Self>, job: JobRequest) -> Result<Uuid, SessionError> {
        let job_id = self.session.try_claim()?;
        let runner = Arc::clone(self);
        tokio::spawn(async move {
            runner.run_claimed(job_id, job).await;
        });
        Ok(job_id)
    }

    async fn run_claimed(&self, job_id: Uuid, job: JobRequest) -> JobOutcome {
        let started = Instant::now();
        metrics::counter!("scan_jobs_submitted_total").increment(1);
        let policy = self.poller.policy();
        tracing::info!(
            job_id = %job_id,
            max_retries = policy.max_retries,
            poll_interval_ms = policy.interval.as_millis() as u64,
            "Job started"
        );

        let outcome = match self.submitter.submit(&self.session, &job).await {
            Ok(token) => self.poller.poll(&self.session, &token).await,
            Err(outcome) => outcome,
        };

        let elapsed = started.elapsed();
        metrics::histogram!("scan_job_duration_seconds").record(elapsed.as_secs_f64());
        metrics::counter!("scan_jobs_finished_total", "outcome" => outcome.to_string()).increment(1);
        tracing::info!(
            job_id = %job_id,
            outcome = %outcome,
            duration_ms = elapsed.as_millis() as u64,
            "Job finished"
        );

        outcome
    }
}
