use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::job::JobRequest;

/// Result-endpoint status code: the recognition output is ready.
pub const CODE_READY: i64 = 200;

/// Result-endpoint status code: the job is accepted but not finished yet.
pub const CODE_PENDING: i64 = 5031;

/// Body of `POST {base}/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub receipt_type: [String; 2],
    pub image_file: [String; 2],
    pub custom_id: String,
}

impl ProcessRequest {
    pub fn new(job: &JobRequest, custom_id: &str) -> Self {
        Self {
            receipt_type: ["shop".to_string(), "slip".to_string()],
            image_file: [job.receipt.as_str().to_string(), job.slip.as_str().to_string()],
            custom_id: custom_id.to_string(),
        }
    }
}

/// Present and not one of `null`, `false`, `0` or `""`.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings verbatim, anything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `meta` block shared by both endpoints.
///
/// Fields are read one by one from the raw body, so a field of an
/// unexpected type never hides its siblings.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    pub code: Option<Value>,
    pub message: Option<String>,
}

impl Meta {
    pub fn from_body(body: &Value) -> Option<Self> {
        let meta = body.get("meta").filter(|m| m.is_object())?;
        Some(Self {
            code: meta.get("code").filter(|c| !c.is_null()).cloned(),
            message: meta.get("message").filter(|m| is_set(m)).map(render),
        })
    }

    /// Numeric status code. Only JSON numbers count; integral floats such
    /// as `200.0` match their integer, strings never do.
    pub fn code_number(&self) -> Option<i64> {
        let Value::Number(n) = self.code.as_ref()? else {
            return None;
        };
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    }

    /// Status code as it should read in a log line.
    pub fn code_label(&self) -> String {
        self.code.as_ref().map(render).unwrap_or_else(|| "unknown".to_string())
    }
}

/// Upload response. Either `data.token` or `meta.message` is expected,
/// but both are optional on the wire.
#[derive(Debug, Clone, Default)]
pub struct ProcessResponse {
    token: Option<String>,
    meta: Option<Meta>,
}

impl ProcessResponse {
    pub fn from_body(body: &Value) -> Self {
        let token = body
            .pointer("/data/token")
            .filter(|t| is_set(t) && (t.is_string() || t.is_number()))
            .map(render);
        Self {
            token,
            meta: Meta::from_body(body),
        }
    }

    /// The token, when present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The error meta, when it carries a message.
    pub fn error_meta(&self) -> Option<&Meta> {
        self.meta.as_ref().filter(|m| m.message.is_some())
    }
}

/// Result response; `data` holds the recognition output once ready.
#[derive(Debug, Clone, Default)]
pub struct ResultResponse {
    pub meta: Option<Meta>,
    pub data: Option<Value>,
}

impl ResultResponse {
    pub fn from_body(body: &Value) -> Self {
        Self {
            meta: Meta::from_body(body),
            data: body.get("data").filter(|d| !d.is_null()).cloned(),
        }
    }

    pub fn code(&self) -> Option<i64> {
        self.meta.as_ref().and_then(Meta::code_number)
    }
}
