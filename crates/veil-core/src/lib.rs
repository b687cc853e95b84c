//! Veil Core - content moderation for whispers and memorial tributes.
//!
//! This crate provides the classification engine and the pure helpers
//! around it:
//!
//! - [`moderation`]: pattern tables, the classifier, and [`Verdict`]
//! - [`resources`]: crisis resources and rejection messages
//! - [`submission`]: validation of raw submission fields
//! - [`alerts`]: operator alert rendering
//!
//! # Example
//!
//! ```
//! use veil_core::moderation::{classify, ModerationAction, SubmissionType};
//!
//! let verdict = classify("Thinking of you today", SubmissionType::Whisper);
//! assert_eq!(verdict.action(), ModerationAction::ApprovePending);
//! ```

pub mod alerts;
pub mod moderation;
pub mod resources;
pub mod submission;

pub use moderation::{classify, ContentModerator, SubmissionType, Verdict};
pub use resources::{crisis_resources, rejection_message, ResourceBundle, RejectionInfo};
pub use submission::{Submission, SubmissionError, Tribute, Whisper};
