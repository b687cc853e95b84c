//! Validated user submissions.
//!
//! Raw request fields are trimmed and checked here before anything is
//! classified or stored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::moderation::SubmissionType;

/// Maximum whisper length in characters.
pub const WHISPER_MAX_CHARS: usize = 280;

/// Maximum tribute message length in characters.
pub const TRIBUTE_MAX_CHARS: usize = 1000;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile"));

/// Reasons a submission is refused before moderation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Whisper text is required")]
    MissingText,

    #[error("Whisper cannot be empty")]
    EmptyText,

    #[error("Whisper cannot exceed 280 characters")]
    TextTooLong,

    #[error("Name is required")]
    MissingName,

    #[error("Message is required")]
    MissingMessage,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message cannot exceed 1000 characters")]
    MessageTooLong,

    #[error("Invalid email address")]
    InvalidEmail,
}

/// A short anonymous reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Whisper {
    pub text: String,
}

impl Whisper {
    /// Validates a raw whisper body. An empty body is reported as missing.
    pub fn new(text: Option<&str>) -> Result<Self, SubmissionError> {
        let text = text
            .filter(|t| !t.is_empty())
            .ok_or(SubmissionError::MissingText)?
            .trim();

        if text.is_empty() {
            return Err(SubmissionError::EmptyText);
        }
        if text.chars().count() > WHISPER_MAX_CHARS {
            return Err(SubmissionError::TextTooLong);
        }

        Ok(Self {
            text: text.to_string(),
        })
    }
}

/// A memorial wall message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tribute {
    pub name: String,
    pub message: String,
    pub email: Option<String>,
}

impl Tribute {
    /// Validates raw tribute fields. A blank email counts as absent.
    ///
    /// An empty name or message is reported as missing, a whitespace-only
    /// one as empty.
    pub fn new(
        name: Option<&str>,
        message: Option<&str>,
        email: Option<&str>,
    ) -> Result<Self, SubmissionError> {
        let name = name
            .filter(|n| !n.is_empty())
            .ok_or(SubmissionError::MissingName)?
            .trim();
        let message = message
            .filter(|m| !m.is_empty())
            .ok_or(SubmissionError::MissingMessage)?
            .trim();

        if name.is_empty() {
            return Err(SubmissionError::EmptyName);
        }
        if message.is_empty() {
            return Err(SubmissionError::EmptyMessage);
        }
        if message.chars().count() > TRIBUTE_MAX_CHARS {
            return Err(SubmissionError::MessageTooLong);
        }

        // Checked untrimmed: surrounding whitespace makes an address invalid
        let email = match email.filter(|e| !e.trim().is_empty()) {
            Some(e) if !EMAIL_RE.is_match(e) => return Err(SubmissionError::InvalidEmail),
            other => other.map(str::to_string),
        };

        Ok(Self {
            name: name.to_string(),
            message: message.to_string(),
            email,
        })
    }
}

/// Any validated submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Submission {
    Whisper(Whisper),
    Tribute(Tribute),
}

impl Submission {
    pub fn kind(&self) -> SubmissionType {
        match self {
            Submission::Whisper(_) => SubmissionType::Whisper,
            Submission::Tribute(_) => SubmissionType::Tribute,
        }
    }

    /// The text passed to the classifier. Tributes moderate the author
    /// name together with the message.
    pub fn moderation_text(&self) -> String {
        match self {
            Submission::Whisper(w) => w.text.clone(),
            Submission::Tribute(t) => format!("{} {}", t.name, t.message),
        }
    }

    /// The main content body.
    pub fn body(&self) -> &str {
        match self {
            Submission::Whisper(w) => &w.text,
            Submission::Tribute(t) => &t.message,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Submission::Whisper(_) => None,
            Submission::Tribute(t) => Some(&t.name),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Submission::Whisper(_) => None,
            Submission::Tribute(t) => t.email.as_deref(),
        }
    }
}

impl From<Whisper> for Submission {
    fn from(w: Whisper) -> Self {
        Submission::Whisper(w)
    }
}

impl From<Tribute> for Submission {
    fn from(t: Tribute) -> Self {
        Submission::Tribute(t)
    }
}
