//! Sampras receipt scanning client
//!
//! Uploads a receipt photograph and a payment slip photograph to the Sampras
//! recognition API, then polls for the asynchronous result with a bounded
//! number of retries. Progress is recorded in a timestamped event log.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
