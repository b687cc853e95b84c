//! Content moderation for whispers and memorial tributes.
//!
//! A deterministic, pattern-based first-pass filter. Each submission is
//! triaged into exactly one of three outcomes: urgent review (crisis
//! language), rejection (offensive or disrespectful content), or routine
//! pending review.

mod category;
mod engine;
mod patterns;
mod verdict;

pub use category::{PatternCategory, SubmissionType};
pub use engine::{classify, ContentModerator, CrisisCheck};
pub use patterns::{PatternError, PatternTables};
pub use verdict::{
    CrisisReason, ModerationAction, ModerationStatus, RejectionReason, Verdict, VerdictSummary,
    CLEAN_REASON,
};
