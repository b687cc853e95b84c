//! API request and response models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use veil_core::resources::CrisisResource;
use veil_core::SubmissionError;

/// Request body for POST /api/whispers.
///
/// Fields are kept as raw JSON so a value of the wrong type is reported
/// through validation instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct WhisperRequest {
    pub text: Option<Value>,
}

impl WhisperRequest {
    pub fn text(&self) -> Option<&str> {
        string_field(&self.text)
    }
}

/// Request body for POST /api/tributes.
#[derive(Debug, Deserialize)]
pub struct TributeRequest {
    pub name: Option<Value>,
    pub message: Option<Value>,
    pub email: Option<Value>,
}

impl TributeRequest {
    pub fn name(&self) -> Option<&str> {
        string_field(&self.name)
    }

    pub fn message(&self) -> Option<&str> {
        string_field(&self.message)
    }

    /// The optional email. Null counts as absent; any other non-string
    /// value is an invalid address.
    pub fn email(&self) -> Result<Option<&str>, SubmissionError> {
        match &self.email {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(SubmissionError::InvalidEmail),
        }
    }
}

/// A string field's value; `None` when absent or not a string.
fn string_field(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

/// Response for a submission flagged as urgent.
///
/// Carries the crisis resource bundle so the submitter sees it at once.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentResponse {
    pub success: bool,
    pub urgent: bool,
    pub message: &'static str,
    pub resources: Vec<CrisisResource>,
    pub closing_message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whisper_received: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tribute_received: Option<bool>,
}

/// Response for a clean submission awaiting review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whisper_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tribute_id: Option<i64>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
