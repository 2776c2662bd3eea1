use base64::Engine;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Which of the two photographs a payload belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageRole {
    Receipt,
    Slip,
}

/// A base64-encoded image as handed over by the acquisition side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wrap an already base64-encoded image. The content is not inspected.
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode raw image bytes after sniffing that they are a known image format.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, JobError> {
        image::guess_format(bytes).map_err(|_| JobError::UnsupportedImage)?;
        Ok(Self(base64::engine::general_purpose::STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Approximate decoded size in kilobytes, estimated from the base64 length.
    pub fn approx_kb(&self) -> u64 {
        let decoded = (self.0.len() as f64 * 0.75 - 2.0).max(0.0);
        (decoded / 1000.0).round() as u64
    }
}

/// Both payloads of one job, guaranteed present.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub receipt: ImagePayload,
    pub slip: ImagePayload,
}

impl JobRequest {
    pub fn new(receipt: Option<ImagePayload>, slip: Option<ImagePayload>) -> Result<Self, JobError> {
        let receipt = receipt.ok_or(JobError::MissingImage(ImageRole::Receipt))?;
        let slip = slip.ok_or(JobError::MissingImage(ImageRole::Slip))?;
        Ok(Self { receipt, slip })
    }
}

/// Correlation token returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a job currently owns the session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    InFlight,
}

/// Terminal outcome of one job.
#[derive(Debug, Clone, Serialize, Display, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobOutcome {
    /// Result became available; carries the full response body.
    Completed { result: serde_json::Value },
    /// Upload answered with an error meta instead of a token.
    UploadRejected { code: String, message: String },
    /// Upload answered with neither a token nor an error message.
    UploadUnrecognized { body: serde_json::Value },
    UploadError,
    /// Result endpoint answered with an unexpected status code.
    ResultFailed { body: serde_json::Value },
    ResultError,
    RetryLimitExceeded,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JobError {
    #[error("Missing {0} image")]
    MissingImage(ImageRole),

    #[error("Unrecognized image format")]
    UnsupportedImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    // PNG signature plus IHDR chunk header.
    const PNG_HEADER: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[test]
    fn test_request_requires_both_images() {
        let receipt = ImagePayload::from_base64("abc");
        let slip = ImagePayload::from_base64("def");

        assert_eq!(
            JobRequest::new(None, Some(slip.clone())).unwrap_err(),
            JobError::MissingImage(ImageRole::Receipt)
        );
        assert_eq!(
            JobRequest::new(Some(receipt.clone()), None).unwrap_err(),
            JobError::MissingImage(ImageRole::Slip)
        );

        let request = JobRequest::new(Some(receipt), Some(slip)).unwrap();
        assert_eq!(request.receipt.as_str(), "abc");
        assert_eq!(request.slip.as_str(), "def");
    }

    #[test]
    fn test_payload_from_png_bytes() {
        let payload = ImagePayload::from_image_bytes(PNG_HEADER).unwrap();
        assert_eq!(payload.as_str(), "iVBORw0KGgoAAAANSUhEUg==");
    }

    #[test]
    fn test_payload_rejects_unknown_format() {
        assert_eq!(
            ImagePayload::from_image_bytes(b"definitely not an image").unwrap_err(),
            JobError::UnsupportedImage
        );
    }

    #[test]
    fn test_approx_kb() {
        assert_eq!(ImagePayload::from_base64("a".repeat(4000)).approx_kb(), 3);
        assert_eq!(ImagePayload::from_base64("").approx_kb(), 0);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(JobOutcome::RetryLimitExceeded.to_string(), "retry_limit_exceeded");
        assert_eq!(RunState::InFlight.to_string(), "in_flight");
        assert!(!JobOutcome::ResultError.is_success());
    }
}
