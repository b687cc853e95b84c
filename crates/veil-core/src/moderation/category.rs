//! Pattern categories and submission kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pattern categories a submission is checked against.
///
/// Declaration order is the priority order used when a text matches
/// more than one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    /// Self-harm, suicidal ideation, or threats toward others.
    Crisis,
    /// Slurs, hate speech, and targeted harassment.
    Offensive,
    /// Mockery or trolling aimed at the dead. Tributes only.
    Disrespectful,
}

impl PatternCategory {
    /// Returns all categories in priority order.
    pub fn all() -> &'static [PatternCategory] {
        &[
            PatternCategory::Crisis,
            PatternCategory::Offensive,
            PatternCategory::Disrespectful,
        ]
    }

    /// Returns a human-readable name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            PatternCategory::Crisis => "Crisis",
            PatternCategory::Offensive => "Offensive",
            PatternCategory::Disrespectful => "Disrespectful",
        }
    }

    /// Whether this category is evaluated for the given submission type.
    pub fn applies_to(&self, submission_type: SubmissionType) -> bool {
        match self {
            PatternCategory::Disrespectful => submission_type == SubmissionType::Tribute,
            _ => true,
        }
    }
}

/// The kind of user submission being moderated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    /// Short anonymous reflection.
    #[default]
    Whisper,
    /// Memorial wall message.
    Tribute,
}

impl SubmissionType {
    /// Lowercase label used in user-facing messages and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Whisper => "whisper",
            SubmissionType::Tribute => "tribute",
        }
    }

    /// Title used in operator alerts.
    pub fn title(&self) -> &'static str {
        match self {
            SubmissionType::Whisper => "Whisper",
            SubmissionType::Tribute => "Memorial Tribute",
        }
    }

    /// Parse from the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "whisper" => Some(SubmissionType::Whisper),
            "tribute" => Some(SubmissionType::Tribute),
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown submission type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_in_priority_order() {
        let all = PatternCategory::all();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(all[0], PatternCategory::Crisis);
    }

    #[test]
    fn disrespectful_applies_to_tributes_only() {
        assert!(PatternCategory::Disrespectful.applies_to(SubmissionType::Tribute));
        assert!(!PatternCategory::Disrespectful.applies_to(SubmissionType::Whisper));
        assert!(PatternCategory::Crisis.applies_to(SubmissionType::Whisper));
        assert!(PatternCategory::Offensive.applies_to(SubmissionType::Whisper));
    }

    #[test]
    fn submission_type_parses_case_insensitively() {
        assert_eq!("Tribute".parse::<SubmissionType>(), Ok(SubmissionType::Tribute));
        assert_eq!("whisper".parse::<SubmissionType>(), Ok(SubmissionType::Whisper));
        assert!("memo".parse::<SubmissionType>().is_err());
    }

    #[test]
    fn submission_type_serializes_lowercase() {
        let json = serde_json::to_string(&SubmissionType::Tribute).unwrap();
        assert_eq!(json, "\"tribute\"");
    }
}
