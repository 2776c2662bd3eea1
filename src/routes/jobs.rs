use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::models::job::{ImagePayload, JobError, JobRequest, RunState};
use crate::models::session::{ErrorResponse, SessionResponse, StartJobResponse};
use crate::services::session::SessionError;

type ApiResult<T> = Result<(StatusCode, Json<T>), (StatusCode, Json<ErrorResponse>)>;

fn reject(status: StatusCode, error: impl ToString) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// POST /api/v1/jobs — Upload a receipt and a slip image and start a job.
pub async fn start_job(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<StartJobResponse> {
    let mut receipt: Option<ImagePayload> = None;
    let mut slip: Option<ImagePayload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e))?
    {
        let slot = match field.name() {
            Some("receipt") => &mut receipt,
            Some("slip") => &mut slip,
            _ => continue,
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| reject(StatusCode::BAD_REQUEST, e))?;
        if data.is_empty() {
            continue;
        }
        let payload = ImagePayload::from_image_bytes(&data)
            .map_err(|e| reject(StatusCode::UNSUPPORTED_MEDIA_TYPE, e))?;
        *slot = Some(payload);
    }

    let job = JobRequest::new(receipt, slip).map_err(|e: JobError| reject(StatusCode::BAD_REQUEST, e))?;
    let receipt_kb = job.receipt.approx_kb();
    let slip_kb = job.slip.approx_kb();

    let job_id = state.runner.start(job).map_err(|e: SessionError| {
        tracing::warn!(error = %e, "Job rejected");
        reject(StatusCode::CONFLICT, e)
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(StartJobResponse {
            job_id,
            status: RunState::InFlight,
            receipt_kb,
            slip_kb,
            message: "Receipt and slip submitted for recognition".to_string(),
        }),
    ))
}

/// GET /api/v1/session — Run state, latest result and event log.
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(state.session.snapshot().into())
}

/// DELETE /api/v1/session/log — Clear the event log and the stored result.
pub async fn clear_log(State(state): State<AppState>) -> StatusCode {
    state.session.clear();
    tracing::info!("Event log and result cleared");
    StatusCode::NO_CONTENT
}
