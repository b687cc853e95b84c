//! The classification engine.
//!
//! Runs the crisis, offensive, and disrespectful checks and merges them
//! into a single [`Verdict`] using the fixed priority
//! Crisis > Offensive > Disrespectful > clean.

use once_cell::sync::Lazy;

use super::patterns::{CategoryPatterns, MarkerSet, PatternError, PatternTables};
use super::{CrisisReason, PatternCategory, RejectionReason, SubmissionType, Verdict};

/// Moderator built from the built-in tables, compiled on first use.
static BUILTIN: Lazy<ContentModerator> = Lazy::new(ContentModerator::new);

/// Result of the crisis check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisCheck {
    /// First match of each crisis rule that fired, in table order.
    pub matches: Vec<String>,
    /// Disambiguated reason, present only when something matched.
    pub reason: Option<CrisisReason>,
}

impl CrisisCheck {
    pub fn is_crisis(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Deterministic pattern-based content moderator.
///
/// Holds only compiled, read-only tables, so a single instance can be
/// shared across threads without locking.
#[derive(Debug, Clone)]
pub struct ContentModerator {
    crisis: CategoryPatterns,
    offensive: CategoryPatterns,
    disrespectful: CategoryPatterns,
    self_harm_markers: MarkerSet,
    threat_markers: MarkerSet,
}

impl ContentModerator {
    /// Creates a moderator with the built-in pattern tables.
    pub fn new() -> Self {
        Self::from_tables(&PatternTables::default()).expect("built-in pattern tables must compile")
    }

    /// Returns the process-wide moderator built from the built-in tables.
    pub fn shared() -> &'static ContentModerator {
        &BUILTIN
    }

    /// Compiles a moderator from custom tables.
    pub fn from_tables(tables: &PatternTables) -> Result<Self, PatternError> {
        Ok(Self {
            crisis: CategoryPatterns::compile(PatternCategory::Crisis, &tables.crisis)?,
            offensive: CategoryPatterns::compile(PatternCategory::Offensive, &tables.offensive)?,
            disrespectful: CategoryPatterns::compile(
                PatternCategory::Disrespectful,
                &tables.disrespectful,
            )?,
            self_harm_markers: MarkerSet::compile("self-harm", &tables.self_harm_markers)?,
            threat_markers: MarkerSet::compile("threat", &tables.threat_markers)?,
        })
    }

    /// Checks for crisis language and works out who it is aimed at.
    ///
    /// Self-harm markers win over threat markers even when both appear.
    pub fn check_crisis(&self, text: &str) -> CrisisCheck {
        let matches = self.crisis.find_all(text);
        if matches.is_empty() {
            return CrisisCheck {
                matches,
                reason: None,
            };
        }

        let reason = if self.self_harm_markers.is_present(text) {
            CrisisReason::SelfHarm
        } else if self.threat_markers.is_present(text) {
            CrisisReason::ThreatToOthers
        } else {
            CrisisReason::General
        };

        CrisisCheck {
            matches,
            reason: Some(reason),
        }
    }

    /// Returns matches for slurs, hate speech, and harassment.
    pub fn check_offensive(&self, text: &str) -> Vec<String> {
        self.offensive.find_all(text)
    }

    /// Returns matches for memorial-wall trolling.
    pub fn check_disrespectful(&self, text: &str) -> Vec<String> {
        self.disrespectful.find_all(text)
    }

    /// Classifies `text` submitted as `submission_type`.
    ///
    /// Never fails: text matching nothing, including the empty string,
    /// yields [`Verdict::Pending`].
    pub fn classify(&self, text: &str, submission_type: SubmissionType) -> Verdict {
        let crisis = self.check_crisis(text);
        if let Some(reason) = crisis.reason {
            return Verdict::Urgent {
                reason,
                matches: crisis.matches,
            };
        }

        let offensive = self.check_offensive(text);
        if !offensive.is_empty() {
            return Verdict::Rejected {
                reason: RejectionReason::Offensive,
                matches: offensive,
            };
        }

        if self.disrespectful.category().applies_to(submission_type) {
            let disrespectful = self.check_disrespectful(text);
            if !disrespectful.is_empty() {
                return Verdict::Rejected {
                    reason: RejectionReason::Disrespectful,
                    matches: disrespectful,
                };
            }
        }

        Verdict::Pending
    }
}

impl Default for ContentModerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies `text` with the built-in tables.
pub fn classify(text: &str, submission_type: SubmissionType) -> Verdict {
    ContentModerator::shared().classify(text, submission_type)
}
