//! Upload of a receipt/slip pair and interpretation of the upload response.
//!
//! Every failure at this stage is terminal: the session is released and the
//! job ends without polling.

use std::sync::Arc;

use crate::models::api::{ProcessRequest, ProcessResponse};
use crate::models::job::{JobOutcome, JobRequest, Token};
use crate::services::recognition::RecognitionApi;
use crate::services::session::Session;

pub struct Submitter {
    api: Arc<dyn RecognitionApi>,
    custom_id: String,
}

impl Submitter {
    pub fn new(api: Arc<dyn RecognitionApi>, custom_id: impl Into<String>) -> Self {
        Self {
            api,
            custom_id: custom_id.into(),
        }
    }

    /// Upload both images. On success the session stays in flight and the
    /// token is handed back for polling; any other outcome releases it.
    pub async fn submit(&self, session: &Session, job: &JobRequest) -> Result<Token, JobOutcome> {
        session.log("start upload");
        session.mark_in_flight();

        tracing::info!(
            receipt_kb = job.receipt.approx_kb(),
            slip_kb = job.slip.approx_kb(),
            custom_id = %self.custom_id,
            "Uploading receipt and slip"
        );

        let request = ProcessRequest::new(job, &self.custom_id);
        let body = match self.api.process(&request).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Upload request failed");
                session.log("upload error");
                session.mark_idle();
                return Err(JobOutcome::UploadError);
            }
        };

        let response = ProcessResponse::from_body(&body);

        if let Some(token) = response.token() {
            session.log("upload success");
            tracing::info!(token = %token, "Upload accepted");
            return Ok(Token::new(token));
        }

        let outcome = match response.error_meta() {
            Some(meta) => {
                let code = meta.code_label();
                let message = meta.message.clone().unwrap_or_default();
                session.log(format!("upload fail: {} - {}", code, message));
                JobOutcome::UploadRejected { code, message }
            }
            None => {
                session.log(format!("upload fail: {}", body));
                JobOutcome::UploadUnrecognized { body }
            }
        };

        tracing::warn!(outcome = %outcome, "Upload rejected");
        session.mark_idle();
        Err(outcome)
    }
}
