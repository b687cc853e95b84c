//! High-level database interface.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::{debug, info};
use veil_core::moderation::{ModerationStatus, Verdict};
use veil_core::Submission;

use crate::error::{Result, StorageError};
use crate::models::{
    origin_for, NewRejection, NewSubmission, RecordOutcome, RejectedSubmission, StatusCounts,
    StoredSubmission,
};
use crate::pool::ConnectionPool;
use crate::repository::{hash_client, RejectionsRepo, SubmissionsRepo};

/// High-level database interface for Veil.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "vaelorinverse", "veil")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("veil.db"))
    }

    // === Submissions ===

    /// Persist a classified submission.
    ///
    /// Rejected submissions go to the rejection log only. Everything else
    /// lands in `submissions` with `approved = false`.
    pub fn record_submission(
        &self,
        submission: &Submission,
        verdict: &Verdict,
        client_address: &str,
    ) -> Result<RecordOutcome> {
        let conn = self.pool.get()?;
        let kind = submission.kind();
        let client_hash = hash_client(client_address);
        let origin = origin_for(kind).to_string();

        if verdict.is_rejected() {
            let id = RejectionsRepo::insert(
                &conn,
                NewRejection {
                    kind,
                    name: submission.name().map(str::to_string),
                    email: submission.email().map(str::to_string),
                    body: submission.body().to_string(),
                    reason: verdict.reason().to_string(),
                    matches: verdict.matches().to_vec(),
                    client_hash,
                    origin,
                },
            )?;
            debug!(id, kind = %kind, "Logged rejected submission");
            return Ok(RecordOutcome::RejectionLogged(id));
        }

        let id = SubmissionsRepo::insert(
            &conn,
            NewSubmission {
                kind,
                name: submission.name().map(str::to_string),
                email: submission.email().map(str::to_string),
                body: submission.body().to_string(),
                status: verdict.status(),
                reason: verdict.reason().to_string(),
                matches: verdict.matches().to_vec(),
                crisis_resources_shown: verdict.crisis_resources_shown(),
                client_hash,
                origin,
            },
        )?;
        debug!(id, kind = %kind, status = verdict.status().as_str(), "Stored submission");

        Ok(RecordOutcome::Stored(id))
    }

    /// Get a stored submission by ID.
    pub fn get_submission(&self, id: i64) -> Result<Option<StoredSubmission>> {
        let conn = self.pool.get()?;
        SubmissionsRepo::get_by_id(&conn, id)
    }

    /// List stored submissions with a given status, newest first.
    pub fn list_by_status(
        &self,
        status: ModerationStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoredSubmission>> {
        let conn = self.pool.get()?;
        SubmissionsRepo::get_by_status(&conn, status, limit, offset)
    }

    /// Count stored submissions with a given status.
    pub fn count_by_status(&self, status: ModerationStatus) -> Result<i64> {
        let conn = self.pool.get()?;
        SubmissionsRepo::count_by_status(&conn, status)
    }

    /// Count all stored submissions.
    pub fn count_submissions(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        SubmissionsRepo::count(&conn)
    }

    /// Review queue sizes. `rejected` counts the rejection log.
    pub fn status_counts(&self) -> Result<StatusCounts> {
        let conn = self.pool.get()?;
        Ok(StatusCounts {
            pending: SubmissionsRepo::count_by_status(&conn, ModerationStatus::Pending)?,
            urgent_review: SubmissionsRepo::count_by_status(&conn, ModerationStatus::UrgentReview)?,
            rejected: RejectionsRepo::count(&conn)?,
        })
    }

    // === Rejections ===

    /// Get recent rejections.
    pub fn recent_rejections(&self, limit: i64, offset: i64) -> Result<Vec<RejectedSubmission>> {
        let conn = self.pool.get()?;
        RejectionsRepo::get_recent(&conn, limit, offset)
    }

    /// Count logged rejections.
    pub fn count_rejections(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        RejectionsRepo::count(&conn)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::in_memory().expect("Failed to create in-memory database")
    }
}
