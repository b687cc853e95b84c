//! Data models for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veil_core::moderation::{ModerationStatus, SubmissionType};

/// Origin tag for tributes.
pub const MEMORIAL_WALL: &str = "memorial-wall";

/// Origin tag for whispers.
pub const WHISPER_WALL: &str = "whisper-wall";

/// Returns the origin tag for a submission kind.
pub fn origin_for(kind: SubmissionType) -> &'static str {
    match kind {
        SubmissionType::Tribute => MEMORIAL_WALL,
        SubmissionType::Whisper => WHISPER_WALL,
    }
}

/// A stored submission awaiting human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSubmission {
    /// Unique identifier.
    pub id: i64,
    /// Whisper or tribute.
    pub kind: SubmissionType,
    /// Tribute author name.
    pub name: Option<String>,
    /// Tribute author email.
    pub email: Option<String>,
    /// Submitted content.
    pub body: String,
    /// Review status from moderation.
    pub status: ModerationStatus,
    pub approved: bool,
    pub rejected: bool,
    /// Moderation reason.
    pub reason: String,
    /// Detected keywords.
    pub matches: Vec<String>,
    pub crisis_resources_shown: bool,
    /// SHA-256 of the submitter address.
    pub client_hash: String,
    /// Where the submission came from.
    pub origin: String,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

/// Parameters for storing a submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub kind: SubmissionType,
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: String,
    pub status: ModerationStatus,
    pub reason: String,
    pub matches: Vec<String>,
    pub crisis_resources_shown: bool,
    pub client_hash: String,
    pub origin: String,
}

/// A logged rejection, kept for monitoring only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedSubmission {
    pub id: i64,
    pub kind: SubmissionType,
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: String,
    pub reason: String,
    pub matches: Vec<String>,
    pub client_hash: String,
    pub origin: String,
    pub rejected_at: DateTime<Utc>,
}

/// Parameters for logging a rejection.
#[derive(Debug, Clone)]
pub struct NewRejection {
    pub kind: SubmissionType,
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: String,
    pub reason: String,
    pub matches: Vec<String>,
    pub client_hash: String,
    pub origin: String,
}

/// Where a classified submission ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "table", content = "id", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Stored in `submissions` for review.
    Stored(i64),
    /// Written to the rejection log.
    RejectionLogged(i64),
}

impl RecordOutcome {
    pub fn id(&self) -> i64 {
        match self {
            RecordOutcome::Stored(id) | RecordOutcome::RejectionLogged(id) => *id,
        }
    }
}

/// Submission counts by review status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub urgent_review: i64,
    pub rejected: i64,
}
