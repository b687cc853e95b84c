//! Database repositories for each table.

pub mod rejections;
pub mod submissions;

pub use rejections::RejectionsRepo;
pub use submissions::{hash_client, SubmissionsRepo};

use chrono::{DateTime, Utc};
use veil_core::moderation::SubmissionType;

/// Parse a datetime from SQLite format.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a JSON string array, tolerating corrupt rows.
pub(crate) fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Parse a submission kind, defaulting to whisper for unknown values.
pub(crate) fn parse_kind(s: &str) -> SubmissionType {
    SubmissionType::parse(s).unwrap_or_default()
}
