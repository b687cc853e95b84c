//! API route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use veil_core::alerts::Alert;
use veil_core::moderation::SubmissionType;
use veil_core::{
    crisis_resources, rejection_message, ResourceBundle, Submission, Tribute, Verdict, Whisper,
};

use crate::error::{ApiError, Result};
use crate::mailer::dispatch_in_background;
use crate::models::{
    HealthResponse, PendingResponse, TributeRequest, UrgentResponse, WhisperRequest,
};
use crate::state::AppState;

const WHISPER_PENDING_MESSAGE: &str =
    "Your whisper has been received and is pending review. Thank you for sharing.";

const TRIBUTE_PENDING_MESSAGE: &str =
    "Your tribute has been received and is pending review. Thank you for honoring their memory.";

/// POST /api/whispers - Submit a whisper.
pub async fn submit_whisper(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<WhisperRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = payload.map_err(reject_body)?;
    let whisper = Whisper::new(req.text())?;

    process_submission(&state, whisper.into(), client_address(&headers))
}

/// POST /api/tributes - Submit a memorial tribute.
pub async fn submit_tribute(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<TributeRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = payload.map_err(reject_body)?;
    // Name and message errors take precedence over a bad email
    let tribute = match req.email() {
        Ok(email) => Tribute::new(req.name(), req.message(), email)?,
        Err(invalid) => {
            Tribute::new(req.name(), req.message(), None)?;
            return Err(invalid.into());
        }
    };

    process_submission(&state, tribute.into(), client_address(&headers))
}

/// GET /api/resources - Crisis support resources.
pub async fn get_resources() -> Json<ResourceBundle> {
    Json(crisis_resources())
}

/// GET /api/health - Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// OPTIONS on submission routes without CORS preflight headers.
pub async fn options_ok() -> StatusCode {
    StatusCode::OK
}

/// Any other method on a submission route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Body extraction failures are logged; the client only gets a fixed message.
fn reject_body(rejection: JsonRejection) -> ApiError {
    debug!(error = %rejection.body_text(), "Rejected request body");
    ApiError::BadRequest("Invalid request body".to_string())
}

/// Classify, persist, and answer a validated submission.
fn process_submission(state: &AppState, submission: Submission, client: &str) -> Result<Response> {
    let kind = submission.kind();
    let verdict = state
        .moderator
        .classify(&submission.moderation_text(), kind);

    debug!(
        kind = %kind,
        chars = submission.body().chars().count(),
        action = verdict.action().as_str(),
        "Classified submission"
    );

    let outcome = state
        .db
        .record_submission(&submission, &verdict, client)
        .map_err(|e| {
            error!(error = %e, kind = %kind, "Failed to record submission");
            ApiError::SubmissionFailed {
                kind,
                details: state.expose_error_details.then(|| e.to_string()),
            }
        })?;

    match &verdict {
        Verdict::Urgent { .. } => {
            warn!(
                kind = %kind,
                id = outcome.id(),
                reason = verdict.reason(),
                "Submission flagged for urgent review"
            );

            if let Some(alert) = Alert::urgent(&submission, &verdict, Utc::now(), &state.dashboard_url)
            {
                dispatch_in_background(state.mailer.clone(), alert);
            }

            let bundle = crisis_resources();
            let received = Some(true);
            Ok(Json(UrgentResponse {
                success: true,
                urgent: true,
                message: bundle.message,
                resources: bundle.resources,
                closing_message: bundle.closing_message,
                whisper_received: received.filter(|_| kind == SubmissionType::Whisper),
                tribute_received: received.filter(|_| kind == SubmissionType::Tribute),
            })
            .into_response())
        }
        Verdict::Rejected { .. } => {
            info!(kind = %kind, reason = verdict.reason(), "Submission rejected");
            Err(ApiError::Rejected(rejection_message(verdict.reason(), kind)))
        }
        Verdict::Pending => {
            info!(kind = %kind, id = outcome.id(), "Submission pending review");

            if kind == SubmissionType::Whisper {
                let notice = Alert::review(&submission, Utc::now(), &state.dashboard_url);
                dispatch_in_background(state.mailer.clone(), notice);
            }

            let (message, whisper_id, tribute_id) = match kind {
                SubmissionType::Whisper => (WHISPER_PENDING_MESSAGE, Some(outcome.id()), None),
                SubmissionType::Tribute => (TRIBUTE_PENDING_MESSAGE, None, Some(outcome.id())),
            };

            Ok(Json(PendingResponse {
                success: true,
                message,
                whisper_id,
                tribute_id,
            })
            .into_response())
        }
    }
}

/// Client address from proxy headers, `unknown` when absent.
fn client_address(headers: &HeaderMap) -> &str {
    ["x-forwarded-for", "client-ip"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or("unknown")
}
