//! Canned recognition API responses and image bytes
#![allow(dead_code)]

use serde_json::{json, Value};

/// PNG signature followed by the IHDR chunk header; enough for format sniffing.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

/// JPEG SOI marker followed by an APP0 segment header.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00];

pub fn upload_accepted(token: &str) -> Value {
    json!({ "meta": { "code": 200, "message": "OK" }, "data": { "token": token } })
}

pub fn upload_rejected(code: i64, message: &str) -> Value {
    json!({ "meta": { "code": code, "message": message } })
}

pub fn result_ready() -> Value {
    json!({
        "meta": { "code": 200, "message": "OK" },
        "data": {
            "shop": { "name": "Corner Market", "total": 152.5, "date": "2024-03-09" },
            "slip": { "bank": "KBank", "amount": 152.5, "ref": "0049120" }
        }
    })
}

pub fn result_pending() -> Value {
    json!({ "meta": { "code": 5031, "message": "Result not ready" } })
}

pub fn result_failed() -> Value {
    json!({ "meta": { "code": 4001, "message": "Unreadable slip" } })
}
