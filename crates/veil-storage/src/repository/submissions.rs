//! Submissions repository.

use rusqlite::{params, Connection, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use veil_core::moderation::ModerationStatus;

use super::{parse_datetime, parse_json_array, parse_kind};
use crate::error::Result;
use crate::models::{NewSubmission, StoredSubmission};

const SELECT_COLUMNS: &str = "SELECT id, kind, name, email, body, status, approved, rejected,
        reason, matches, crisis_resources_shown, client_hash, origin, created_at
     FROM submissions";

/// Repository for submissions awaiting review.
pub struct SubmissionsRepo;

impl SubmissionsRepo {
    /// Insert a new submission.
    pub fn insert(conn: &Connection, submission: NewSubmission) -> Result<i64> {
        let matches_json = serde_json::to_string(&submission.matches)?;

        conn.execute(
            "INSERT INTO submissions (kind, name, email, body, status, approved, rejected,
                                      reason, matches, crisis_resources_shown, client_hash, origin)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                submission.kind.as_str(),
                submission.name,
                submission.email,
                submission.body,
                submission.status.as_str(),
                submission.status == ModerationStatus::Rejected,
                submission.reason,
                matches_json,
                submission.crisis_resources_shown,
                submission.client_hash,
                submission.origin,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a submission by ID.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<StoredSubmission>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        let submission = stmt.query_row([id], map_row).optional()?;
        Ok(submission)
    }

    /// Get submissions with a given status, newest first.
    pub fn get_by_status(
        conn: &Connection,
        status: ModerationStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoredSubmission>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE status = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
            SELECT_COLUMNS
        ))?;

        let submissions = stmt
            .query_map(params![status.as_str(), limit, offset], map_row)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(submissions)
    }

    /// Count total submissions.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count submissions by status.
    pub fn count_by_status(conn: &Connection, status: ModerationStatus) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM submissions WHERE status = ?1",
            [status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<StoredSubmission> {
    Ok(StoredSubmission {
        id: row.get(0)?,
        kind: parse_kind(&row.get::<_, String>(1)?),
        name: row.get(2)?,
        email: row.get(3)?,
        body: row.get(4)?,
        status: row
            .get::<_, String>(5)
            .ok()
            .and_then(|s| ModerationStatus::parse(&s))
            .unwrap_or(ModerationStatus::Pending),
        approved: row.get(6)?,
        rejected: row.get(7)?,
        reason: row.get(8)?,
        matches: parse_json_array(&row.get::<_, String>(9)?),
        crisis_resources_shown: row.get(10)?,
        client_hash: row.get(11)?,
        origin: row.get(12)?,
        created_at: parse_datetime(&row.get::<_, String>(13)?),
    })
}

/// Hash a client address using SHA-256.
pub fn hash_client(address: &str) -> String {
    let digest = Sha256::digest(address.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::run_migrations;
    use veil_core::moderation::SubmissionType;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn new_submission(status: ModerationStatus) -> NewSubmission {
        NewSubmission {
            kind: SubmissionType::Tribute,
            name: Some("Ana".to_string()),
            email: None,
            body: "Rest easy".to_string(),
            status,
            reason: "Content passed automated moderation".to_string(),
            matches: vec![],
            crisis_resources_shown: false,
            client_hash: hash_client("10.0.0.1"),
            origin: "memorial-wall".to_string(),
        }
    }

    #[test]
    fn test_insert_and_get_submission() {
        let conn = setup_db();

        let mut submission = new_submission(ModerationStatus::UrgentReview);
        submission.matches = vec!["bridge".to_string()];
        submission.crisis_resources_shown = true;

        let id = SubmissionsRepo::insert(&conn, submission).unwrap();
        let stored = SubmissionsRepo::get_by_id(&conn, id).unwrap().unwrap();

        assert_eq!(stored.kind, SubmissionType::Tribute);
        assert_eq!(stored.name.as_deref(), Some("Ana"));
        assert_eq!(stored.status, ModerationStatus::UrgentReview);
        assert_eq!(stored.matches, vec!["bridge".to_string()]);
        assert!(stored.crisis_resources_shown);
        assert!(!stored.approved);
        assert!(!stored.rejected);
        assert_eq!(stored.origin, "memorial-wall");
    }

    #[test]
    fn test_get_missing_submission() {
        let conn = setup_db();
        assert!(SubmissionsRepo::get_by_id(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_get_reports_unreadable_rows() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO submissions (kind, body, status, reason, client_hash, origin)
             VALUES ('whisper', X'FF', 'pending', 'r', 'h', 'whisper-wall')",
            [],
        )
        .unwrap();
        let id = conn.last_insert_rowid();

        assert!(SubmissionsRepo::get_by_id(&conn, id).is_err());
    }

    #[test]
    fn test_get_by_status_and_counts() {
        let conn = setup_db();

        for _ in 0..3 {
            SubmissionsRepo::insert(&conn, new_submission(ModerationStatus::Pending)).unwrap();
        }
        SubmissionsRepo::insert(&conn, new_submission(ModerationStatus::UrgentReview)).unwrap();

        let pending = SubmissionsRepo::get_by_status(&conn, ModerationStatus::Pending, 2, 0).unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|s| s.status == ModerationStatus::Pending));

        assert_eq!(SubmissionsRepo::count(&conn).unwrap(), 4);
        assert_eq!(
            SubmissionsRepo::count_by_status(&conn, ModerationStatus::UrgentReview).unwrap(),
            1
        );
        assert_eq!(
            SubmissionsRepo::count_by_status(&conn, ModerationStatus::Rejected).unwrap(),
            0
        );
    }

    #[test]
    fn test_hash_client() {
        let hash1 = hash_client("203.0.113.7");
        let hash2 = hash_client("203.0.113.7");
        let hash3 = hash_client("unknown");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }
}
