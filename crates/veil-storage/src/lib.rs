//! Veil Storage - SQLite persistence layer.
//!
//! Classified submissions are written here before anyone sees them:
//!
//! - Pending and urgent submissions go to the review queue (`submissions`)
//! - Rejected submissions go to a separate log (`rejected_submissions`)
//! - Client addresses are stored as SHA-256 hashes, never in plain text
//!
//! # Example
//!
//! ```no_run
//! use veil_core::{classify, Submission, Whisper};
//! use veil_storage::Database;
//!
//! let db = Database::in_memory().unwrap();
//!
//! let submission: Submission = Whisper::new(Some("thinking of you")).unwrap().into();
//! let verdict = classify(&submission.moderation_text(), submission.kind());
//! db.record_submission(&submission, &verdict, "203.0.113.9").unwrap();
//! ```

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;

pub use database::Database;
pub use error::{Result, StorageError};
pub use models::{
    origin_for, NewRejection, NewSubmission, RecordOutcome, RejectedSubmission, StatusCounts,
    StoredSubmission, MEMORIAL_WALL, WHISPER_WALL,
};
pub use pool::ConnectionPool;
pub use repository::{hash_client, RejectionsRepo, SubmissionsRepo};
