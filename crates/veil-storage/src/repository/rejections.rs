//! Rejection log repository.

use rusqlite::{params, Connection, Row};

use super::{parse_datetime, parse_json_array, parse_kind};
use crate::error::Result;
use crate::models::{NewRejection, RejectedSubmission};

/// Repository for the rejected-submission log.
pub struct RejectionsRepo;

impl RejectionsRepo {
    /// Log a rejected submission.
    pub fn insert(conn: &Connection, rejection: NewRejection) -> Result<i64> {
        let matches_json = serde_json::to_string(&rejection.matches)?;

        conn.execute(
            "INSERT INTO rejected_submissions (kind, name, email, body, reason, matches, client_hash, origin)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                rejection.kind.as_str(),
                rejection.name,
                rejection.email,
                rejection.body,
                rejection.reason,
                matches_json,
                rejection.client_hash,
                rejection.origin,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get recent rejections with pagination.
    pub fn get_recent(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<RejectedSubmission>> {
        let mut stmt = conn.prepare(
            "SELECT id, kind, name, email, body, reason, matches, client_hash, origin, rejected_at
             FROM rejected_submissions ORDER BY rejected_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;

        let rejections = stmt
            .query_map([limit, offset], map_row)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rejections)
    }

    /// Count logged rejections.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM rejected_submissions", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<RejectedSubmission> {
    Ok(RejectedSubmission {
        id: row.get(0)?,
        kind: parse_kind(&row.get::<_, String>(1)?),
        name: row.get(2)?,
        email: row.get(3)?,
        body: row.get(4)?,
        reason: row.get(5)?,
        matches: parse_json_array(&row.get::<_, String>(6)?),
        client_hash: row.get(7)?,
        origin: row.get(8)?,
        rejected_at: parse_datetime(&row.get::<_, String>(9)?),
    })
}
