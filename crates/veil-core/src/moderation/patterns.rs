//! Pattern tables for the moderation engine.
//!
//! Rule text is plain data: [`PatternTables`] can be serialized to JSON,
//! edited, and loaded back without touching the matching code. The
//! built-in tables are returned by [`PatternTables::default`].

use std::path::Path;

use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::PatternCategory;

/// Crisis rules: self-harm, threats toward others, immediate danger.
const CRISIS_PATTERNS: &[&str] = &[
    // Self-harm
    r"\b(kill myself|suicide|end my life|take my life|want to die|should i die)\b",
    r"\b(cutting myself|hurt myself|harm myself|self harm)\b",
    r"\b(no reason to live|better off dead|worthless|can't go on)\b",
    r"\b(goodbye cruel world|final goodbye|last message)\b",
    // Harm to others
    r"\b(kill (them|him|her|you|everyone)|murder|shoot up|mass shooting)\b",
    r"\b(going to hurt|planning to attack|weapon|gun|knife|bomb)\b",
    r"\b(they deserve to die|make them pay|revenge)\b",
    // Immediate danger
    r"\b(right now|tonight|today|soon|can't wait)\b.*\b(die|kill|end it|hurt)\b",
    r"\b(pills|overdose|hanging|jump off|bridge)\b",
];

/// Offensive rules: slurs, hateful statements, targeted harassment.
const OFFENSIVE_PATTERNS: &[&str] = &[
    // Racial slurs, including common character substitutions
    r"\b(n[i1]gg[ae]r|n[i1]gg[ae]|f[a@]gg[o0]t|ch[i1]nk|sp[i1]c|k[i1]ke)\b",
    r"\b(wetb[a@]ck|beaner|gook|sand n[i1]gg[ae]r|towelhead)\b",
    // Hateful statements about groups
    r"\b(hate (blacks|whites|asians|hispanics|jews|muslims|christians|gays|trans))\b",
    r"\b((blacks|whites|asians|hispanics|jews|muslims) (are|should) (die|burn|suffer))\b",
    // Misogynistic slurs aimed at women
    r"\b(wh[o0]re|sl[u*]t|c[u*]nt|b[i1]tch)\b.*\b(women|girls|female)\b",
    // Homophobic and transphobic
    r"\b(f[a@]g|dyke|tr[a@]nny)\b",
    r"\b((gays|trans) (should|deserve to|need to) (die|burn|suffer))\b",
    // Harassment
    r"\b(kill yourself|kys|neck yourself|rope yourself)\b",
    r"\b(subhuman|degenerate|vermin|scum)\b.*\b(race|religion|people)\b",
];

/// Disrespectful rules for the memorial wall.
const DISRESPECTFUL_PATTERNS: &[&str] = &[
    r"\b(lol|lmao|haha|rofl)\b.*\b(dead|died|death|rip)\b",
    r"\b(glad|happy|celebrate)\b.*\b(dead|died|death)\b",
    r"\b(deserved|had it coming|good riddance)\b",
    r"\b(fake|lying|scam|fraud|attention)\b.*\b(memorial|tribute|grief)\b",
    r"\b(rot in hell|burn in hell|hope (they|he|she) suffered)\b",
];

/// First-person phrases that mark crisis language as self-directed.
const SELF_HARM_MARKERS: &[&str] = &["myself", "my life", "i want", "i should", "i can't"];

/// Phrases that mark crisis language as directed at other people.
const THREAT_MARKERS: &[&str] = &[
    "them", "him", "her", "you", "everyone", "they", "shoot up", "attack",
];

/// Errors raised while compiling pattern tables.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A single rule failed to compile.
    #[error("invalid {category:?} rule #{index}: {source}")]
    InvalidRule {
        category: PatternCategory,
        index: usize,
        #[source]
        source: regex::Error,
    },

    /// The combined rule set for a category failed to compile.
    #[error("invalid {category:?} rule set: {source}")]
    InvalidSet {
        category: PatternCategory,
        #[source]
        source: regex::Error,
    },

    /// A marker list failed to compile.
    #[error("invalid {name} markers: {source}")]
    InvalidMarkers {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    /// The tables file could not be parsed.
    #[error("pattern tables JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The tables file could not be read.
    #[error("pattern tables IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Editable rule tables for every category.
///
/// Rules are regular expressions matched case-insensitively. Markers are
/// literal phrases matched case-insensitively anywhere in the text.
/// Lists missing from a JSON document keep their built-in values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTables {
    pub crisis: Vec<String>,
    pub offensive: Vec<String>,
    pub disrespectful: Vec<String>,
    pub self_harm_markers: Vec<String>,
    pub threat_markers: Vec<String>,
}

impl Default for PatternTables {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            crisis: owned(CRISIS_PATTERNS),
            offensive: owned(OFFENSIVE_PATTERNS),
            disrespectful: owned(DISRESPECTFUL_PATTERNS),
            self_harm_markers: owned(SELF_HARM_MARKERS),
            threat_markers: owned(THREAT_MARKERS),
        }
    }
}

impl PatternTables {
    /// Parses tables from JSON.
    ///
    /// Expected format:
    /// ```json
    /// {
    ///   "crisis": ["\\bsuicide\\b"],
    ///   "offensive": [],
    ///   "disrespectful": [],
    ///   "self_harm_markers": ["myself"],
    ///   "threat_markers": ["them"]
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, PatternError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads tables from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns the rules for a category.
    pub fn rules(&self, category: PatternCategory) -> &[String] {
        match category {
            PatternCategory::Crisis => &self.crisis,
            PatternCategory::Offensive => &self.offensive,
            PatternCategory::Disrespectful => &self.disrespectful,
        }
    }
}

/// Compiled rules for one category.
#[derive(Debug, Clone)]
pub(crate) struct CategoryPatterns {
    category: PatternCategory,
    /// Regex set for fast multi-pattern matching.
    regex_set: RegexSet,
    /// Individual regexes for extracting matched text.
    regexes: Vec<Regex>,
}

impl CategoryPatterns {
    pub(crate) fn compile(
        category: PatternCategory,
        patterns: &[String],
    ) -> Result<Self, PatternError> {
        let patterns: Vec<String> = patterns.iter().map(|p| ascii_word_boundaries(p)).collect();

        let regexes = patterns
            .iter()
            .enumerate()
            .map(|(index, p)| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .crlf(true)
                    .build()
                    .map_err(|source| PatternError::InvalidRule {
                        category,
                        index,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regex_set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .crlf(true)
            .build()
            .map_err(|source| PatternError::InvalidSet { category, source })?;

        debug!(category = category.name(), rules = regexes.len(), "Compiled patterns");

        Ok(Self {
            category,
            regex_set,
            regexes,
        })
    }

    pub(crate) fn category(&self) -> PatternCategory {
        self.category
    }

    /// Returns the first match of every rule that fires, in table order.
    pub(crate) fn find_all(&self, text: &str) -> Vec<String> {
        let hits = self.regex_set.matches(text);
        if !hits.matched_any() {
            return Vec::new();
        }

        hits.into_iter()
            .filter_map(|i| self.regexes[i].find(text))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Rewrites `\b` as an ASCII-only word boundary, so that non-ASCII
/// letters count as non-word characters next to a rule's keywords.
fn ascii_word_boundaries(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push_str(r"(?-u:\b)"),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Case-insensitive literal phrase detector.
#[derive(Debug, Clone)]
pub(crate) struct MarkerSet {
    regex: Option<Regex>,
}

impl MarkerSet {
    pub(crate) fn compile(name: &'static str, markers: &[String]) -> Result<Self, PatternError> {
        if markers.is_empty() {
            return Ok(Self { regex: None });
        }

        let alternation = markers
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::InvalidMarkers { name, source })?;

        Ok(Self { regex: Some(regex) })
    }

    pub(crate) fn is_present(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_tables_have_expected_sizes() {
        let tables = PatternTables::default();
        assert_eq!(tables.crisis.len(), 9);
        assert_eq!(tables.offensive.len(), 9);
        assert_eq!(tables.disrespectful.len(), 5);
        assert_eq!(tables.self_harm_markers.len(), 5);
        assert_eq!(tables.threat_markers.len(), 8);
    }

    #[test]
    fn default_tables_compile() {
        let tables = PatternTables::default();
        for category in PatternCategory::all() {
            assert!(CategoryPatterns::compile(*category, tables.rules(*category)).is_ok());
        }
    }

    #[test]
    fn find_all_keeps_table_order_and_original_casing() {
        let patterns = CategoryPatterns::compile(
            PatternCategory::Crisis,
            &["\\bzebra\\b".to_string(), "\\bapple\\b".to_string()],
        )
        .unwrap();

        let found = patterns.find_all("Apple before ZEBRA");
        assert_eq!(found, vec!["ZEBRA".to_string(), "Apple".to_string()]);
    }

    #[test]
    fn find_all_respects_word_boundaries() {
        let patterns =
            CategoryPatterns::compile(PatternCategory::Crisis, &["\\bgun\\b".to_string()]).unwrap();
        assert!(patterns.find_all("a begun project").is_empty());
        assert_eq!(patterns.find_all("a gun"), vec!["gun".to_string()]);
    }

    #[test]
    fn empty_rule_list_never_matches() {
        let patterns = CategoryPatterns::compile(PatternCategory::Offensive, &[]).unwrap();
        assert!(patterns.find_all("anything at all").is_empty());
    }

    #[test]
    fn invalid_rule_reports_category_and_index() {
        let err = CategoryPatterns::compile(
            PatternCategory::Offensive,
            &["\\bok\\b".to_string(), "(unclosed".to_string()],
        )
        .unwrap_err();

        match err {
            PatternError::InvalidRule {
                category, index, ..
            } => {
                assert_eq!(category, PatternCategory::Offensive);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn markers_match_as_plain_substrings() {
        let markers = MarkerSet::compile("threat", &["her".to_string()]).unwrap();
        assert!(markers.is_present("somewhere"));
        assert!(markers.is_present("HER"));
        assert!(!markers.is_present("him"));
    }

    #[test]
    fn markers_escape_regex_syntax() {
        let markers = MarkerSet::compile("self", &["i can't (really)".to_string()]).unwrap();
        assert!(markers.is_present("I can't (really) say"));
        assert!(!markers.is_present("I can't really say"));
    }

    #[test]
    fn word_boundaries_are_ascii() {
        assert_eq!(ascii_word_boundaries(r"\b(gun)\b"), r"(?-u:\b)(gun)(?-u:\b)");
        assert_eq!(ascii_word_boundaries(r"a\\b\B\d"), r"a\\b\B\d");

        let rules = CategoryPatterns::compile(PatternCategory::Crisis, &[r"\bgun\b".to_string()])
            .unwrap();
        assert_eq!(rules.find_all("ægun"), vec!["gun".to_string()]);
        assert!(rules.find_all("shotgun").is_empty());
    }

    #[test]
    fn dot_does_not_cross_carriage_returns() {
        let rules = CategoryPatterns::compile(
            PatternCategory::Crisis,
            &[r"\b(tonight)\b.*\b(hurt)\b".to_string()],
        )
        .unwrap();
        assert!(rules.find_all("tonight\rwe hurt").is_empty());
        assert_eq!(rules.find_all("tonight we hurt"), vec!["tonight we hurt".to_string()]);
    }

    #[test]
    fn empty_markers_never_match() {
        let markers = MarkerSet::compile("self", &[]).unwrap();
        assert!(!markers.is_present("myself"));
    }

    #[test]
    fn tables_round_trip_through_a_file() {
        let tables = PatternTables::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&tables).unwrap().as_bytes())
            .unwrap();

        let loaded = PatternTables::from_file(file.path()).unwrap();
        assert_eq!(loaded, tables);
    }

    #[test]
    fn missing_lists_keep_builtins() {
        let tables = PatternTables::from_json(r#"{"offensive": ["\\bjerk\\b"]}"#).unwrap();
        assert_eq!(tables.offensive, vec![r"\bjerk\b".to_string()]);
        assert_eq!(tables.crisis, PatternTables::default().crisis);
        assert_eq!(tables.threat_markers, PatternTables::default().threat_markers);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            PatternTables::from_json("{\"crisis\": 3}"),
            Err(PatternError::Json(_))
        ));
    }
}
