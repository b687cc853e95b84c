//! Moderation verdicts.

use serde::{Deserialize, Serialize, Serializer};

/// Reason string for content that passed every check.
pub const CLEAN_REASON: &str = "Content passed automated moderation";

/// Action the caller must take for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModerationAction {
    /// Store for urgent human review and show crisis resources.
    FlagUrgent,
    /// Refuse the submission.
    Reject,
    /// Store for routine review.
    ApprovePending,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::FlagUrgent => "flag-urgent",
            ModerationAction::Reject => "reject",
            ModerationAction::ApprovePending => "approve-pending",
        }
    }
}

/// Review status recorded alongside a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModerationStatus {
    UrgentReview,
    Rejected,
    Pending,
}

impl ModerationStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::UrgentReview => "urgent-review",
            ModerationStatus::Rejected => "rejected",
            ModerationStatus::Pending => "pending",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "urgent-review" => Some(ModerationStatus::UrgentReview),
            "rejected" => Some(ModerationStatus::Rejected),
            "pending" => Some(ModerationStatus::Pending),
            _ => None,
        }
    }
}

/// Who crisis language appears to be aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisReason {
    /// First-person self-harm or suicidal language.
    SelfHarm,
    /// Violence directed at other people.
    ThreatToOthers,
    /// Crisis language with no clear target.
    General,
}

impl CrisisReason {
    pub fn message(&self) -> &'static str {
        match self {
            CrisisReason::SelfHarm => "Self-harm or suicidal language detected",
            CrisisReason::ThreatToOthers => "Threats of violence toward others detected",
            CrisisReason::General => "Crisis language detected",
        }
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Slurs, hate speech, or harassment.
    Offensive,
    /// Mockery or trolling on the memorial wall.
    Disrespectful,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::Offensive => "Offensive language, hate speech, or slurs detected",
            RejectionReason::Disrespectful => "Disrespectful or trolling language detected",
        }
    }
}

/// Outcome of classifying one submission.
///
/// Exactly one variant is produced per call. Every variant still requires a
/// human decision before anything is published, so none of them is an
/// approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Crisis language: urgent human review, crisis resources shown.
    Urgent {
        reason: CrisisReason,
        matches: Vec<String>,
    },
    /// Offensive or disrespectful content: refused.
    Rejected {
        reason: RejectionReason,
        matches: Vec<String>,
    },
    /// Nothing matched: queued for routine review.
    Pending,
}

impl Verdict {
    pub fn action(&self) -> ModerationAction {
        match self {
            Verdict::Urgent { .. } => ModerationAction::FlagUrgent,
            Verdict::Rejected { .. } => ModerationAction::Reject,
            Verdict::Pending => ModerationAction::ApprovePending,
        }
    }

    pub fn status(&self) -> ModerationStatus {
        match self {
            Verdict::Urgent { .. } => ModerationStatus::UrgentReview,
            Verdict::Rejected { .. } => ModerationStatus::Rejected,
            Verdict::Pending => ModerationStatus::Pending,
        }
    }

    /// Human-readable explanation of which check fired.
    pub fn reason(&self) -> &'static str {
        match self {
            Verdict::Urgent { reason, .. } => reason.message(),
            Verdict::Rejected { reason, .. } => reason.message(),
            Verdict::Pending => CLEAN_REASON,
        }
    }

    /// Literal substrings that triggered the verdict, in rule order.
    pub fn matches(&self) -> &[String] {
        match self {
            Verdict::Urgent { matches, .. } | Verdict::Rejected { matches, .. } => matches,
            Verdict::Pending => &[],
        }
    }

    /// Always false: automated moderation never publishes on its own.
    pub fn is_approved(&self) -> bool {
        false
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::Rejected { .. })
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Verdict::Urgent { .. })
    }

    /// Whether the submitter is shown crisis resources.
    pub fn crisis_resources_shown(&self) -> bool {
        self.is_urgent()
    }

    /// Flattened view used on the wire and in logs.
    pub fn summary(&self) -> VerdictSummary {
        VerdictSummary {
            action: self.action(),
            status: self.status(),
            reason: self.reason(),
            matches: self.matches().to_vec(),
            approved: self.is_approved(),
            rejected: self.is_rejected(),
            crisis_resources_shown: self.crisis_resources_shown(),
        }
    }
}

/// Flat record of a [`Verdict`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictSummary {
    pub action: ModerationAction,
    pub status: ModerationStatus,
    pub reason: &'static str,
    pub matches: Vec<String>,
    pub approved: bool,
    pub rejected: bool,
    pub crisis_resources_shown: bool,
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.summary().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urgent_verdict_views() {
        let verdict = Verdict::Urgent {
            reason: CrisisReason::SelfHarm,
            matches: vec!["end my life".to_string()],
        };
        assert_eq!(verdict.action(), ModerationAction::FlagUrgent);
        assert_eq!(verdict.status(), ModerationStatus::UrgentReview);
        assert_eq!(verdict.reason(), "Self-harm or suicidal language detected");
        assert!(verdict.crisis_resources_shown());
        assert!(!verdict.is_approved());
        assert!(!verdict.is_rejected());
    }

    #[test]
    fn rejected_verdict_views() {
        let verdict = Verdict::Rejected {
            reason: RejectionReason::Disrespectful,
            matches: vec!["deserved".to_string()],
        };
        assert_eq!(verdict.action(), ModerationAction::Reject);
        assert_eq!(verdict.status(), ModerationStatus::Rejected);
        assert!(verdict.is_rejected());
        assert!(!verdict.crisis_resources_shown());
        assert_eq!(verdict.matches(), ["deserved".to_string()]);
    }

    #[test]
    fn pending_verdict_has_no_matches() {
        let verdict = Verdict::Pending;
        assert_eq!(verdict.action(), ModerationAction::ApprovePending);
        assert_eq!(verdict.reason(), CLEAN_REASON);
        assert!(verdict.matches().is_empty());
        assert!(!verdict.is_rejected());
    }

    #[test]
    fn verdict_serializes_flat() {
        let verdict = Verdict::Urgent {
            reason: CrisisReason::ThreatToOthers,
            matches: vec!["going to hurt".to_string()],
        };
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            value,
            json!({
                "action": "flag-urgent",
                "status": "urgent-review",
                "reason": "Threats of violence toward others detected",
                "matches": ["going to hurt"],
                "approved": false,
                "rejected": false,
                "crisisResourcesShown": true
            })
        );
    }

    #[test]
    fn status_parse_matches_as_str() {
        for status in [
            ModerationStatus::UrgentReview,
            ModerationStatus::Rejected,
            ModerationStatus::Pending,
        ] {
            assert_eq!(ModerationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ModerationStatus::parse("approved"), None);
    }
}
