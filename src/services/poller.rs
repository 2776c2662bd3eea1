//! Result polling with a fixed interval and a bounded number of retries.
//!
//! Only the pending status code is retried. Transport failures and any other
//! status code end the job immediately.

use std::sync::Arc;
use std::time::Duration;

use crate::models::api::{ResultResponse, CODE_PENDING, CODE_READY};
use crate::models::job::{JobOutcome, Token};
use crate::services::delay::Delay;
use crate::services::recognition::RecognitionApi;
use crate::services::session::Session;

/// Retry bound and spacing for result polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Retries after the initial attempt; total requests are `max_retries + 1`.
    pub max_retries: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            interval: Duration::from_millis(1000),
        }
    }
}

pub struct Poller {
    api: Arc<dyn RecognitionApi>,
    delay: Arc<dyn Delay>,
    policy: PollPolicy,
}

impl Poller {
    pub fn new(api: Arc<dyn RecognitionApi>, delay: Arc<dyn Delay>, policy: PollPolicy) -> Self {
        Self { api, delay, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll until the result is ready, fails, or the retry budget runs out.
    /// The session is idle when this returns.
    pub async fn poll(&self, session: &Session, token: &Token) -> JobOutcome {
        let mut attempt: u32 = 0;

        loop {
            session.clear_result();
            session.mark_in_flight();
            if attempt > 0 {
                session.log(format!("retry get result: {}", attempt));
            } else {
                session.log("start get result");
            }
            metrics::counter!("scan_poll_attempts_total").increment(1);

            let body = match self.api.result(token).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!(token = %token, attempt, error = %e, "Result request failed");
                    session.mark_idle();
                    session.log("result error");
                    return JobOutcome::ResultError;
                }
            };

            match ResultResponse::from_body(&body).code() {
                Some(CODE_READY) => {
                    session.log("result available");
                    session.store_result(body.clone());
                    session.mark_idle();
                    return JobOutcome::Completed { result: body };
                }
                Some(CODE_PENDING) => {
                    session.log("result pending");
                    if attempt < self.policy.max_retries {
                        tracing::debug!(token = %token, attempt, "Result pending, retrying");
                        self.delay.wait(self.policy.interval).await;
                        attempt += 1;
                        continue;
                    }
                    session.log("retry limit exceeded");
                    tracing::warn!(token = %token, attempts = attempt + 1, "Result still pending after max retries");
                    session.mark_idle();
                    return JobOutcome::RetryLimitExceeded;
                }
                code => {
                    tracing::warn!(token = %token, code = ?code, "Result failed");
                    session.log(format!("result fail: {}", body));
                    session.mark_idle();
                    return JobOutcome::ResultFailed { body };
                }
            }
        }
    }
}
