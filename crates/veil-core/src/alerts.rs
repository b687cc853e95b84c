//! Operator alert formatting.
//!
//! Builds the email sent to the site operators when a submission needs
//! attention. Delivery lives with the caller; this module only renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::moderation::Verdict;
use crate::submission::Submission;

/// Default admin dashboard link included in alerts.
pub const DEFAULT_DASHBOARD_URL: &str = "https://vaelorinverse.com/admin/dashboard.html";

/// Which operator inbox an alert is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Crisis language; goes to the admin address.
    Urgent,
    /// Clean submission awaiting routine review; goes to the info address.
    Review,
}

/// A rendered operator alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub subject: String,
    pub html: String,
}

impl Alert {
    /// Renders an urgent alert. Returns `None` unless the verdict is urgent.
    pub fn urgent(
        submission: &Submission,
        verdict: &Verdict,
        submitted_at: DateTime<Utc>,
        dashboard_url: &str,
    ) -> Option<Self> {
        if !verdict.is_urgent() {
            return None;
        }

        let kind = submission.kind();
        let keywords = if verdict.matches().is_empty() {
            "N/A".to_string()
        } else {
            escape_html(&verdict.matches().join(", "))
        };

        let content_heading = match submission {
            Submission::Whisper(_) => "Whisper Content:",
            Submission::Tribute(_) => "Tribute Message:",
        };

        let mut html = String::new();
        html.push_str(&format!(
            "<h1 style=\"color: #ef4444;\">🚨 URGENT {} ALERT</h1>\n",
            kind.title().to_uppercase()
        ));
        html.push_str(
            "<p><strong>Status:</strong> <span style=\"color: #ef4444;\">Requires Immediate Review</span></p>\n",
        );
        html.push_str(&format!(
            "<p><strong>Reason:</strong> {}</p>\n",
            escape_html(verdict.reason())
        ));
        html.push_str(&format!(
            "<p><strong>Submitted:</strong> {}</p>\n",
            submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        html.push_str(&author_rows(submission));
        html.push_str(&format!(
            "<h3>{}</h3>\n<blockquote style=\"border-left: 4px solid #ef4444; padding: 15px;\">\"{}\"</blockquote>\n",
            content_heading,
            escape_html(submission.body())
        ));
        html.push_str(&format!("<h3>Detected Keywords:</h3>\n<p>{}</p>\n", keywords));
        html.push_str(
            "<h3>Actions Taken:</h3>\n<ul>\n\
             <li>Crisis resources automatically shown to user</li>\n\
             <li>Submission flagged for urgent review</li>\n\
             <li>Admin notification sent (this email)</li>\n\
             <li>Saved to database with urgent status</li>\n\
             </ul>\n",
        );
        html.push_str(&dashboard_link(dashboard_url));
        html.push_str(
            "<p style=\"color: #6b7280;\">This is an automated alert from the VaelorinVerse content moderation system.</p>\n",
        );

        Some(Self {
            kind: AlertKind::Urgent,
            subject: format!("🚨 URGENT: Crisis Language Detected in {}", kind.title()),
            html,
        })
    }

    /// Renders a notice for a clean submission awaiting review.
    pub fn review(submission: &Submission, submitted_at: DateTime<Utc>, dashboard_url: &str) -> Self {
        let kind = submission.kind();

        let mut html = String::new();
        html.push_str(&format!("<h2>New {} Pending Review</h2>\n", kind.title()));
        html.push_str(&format!(
            "<p><strong>Submitted:</strong> {}</p>\n",
            submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        html.push_str(&author_rows(submission));
        html.push_str(&format!(
            "<blockquote>\"{}\"</blockquote>\n",
            escape_html(submission.body())
        ));
        html.push_str(&dashboard_link(dashboard_url));

        Self {
            kind: AlertKind::Review,
            subject: format!("New {} Pending Review", kind.title()),
            html,
        }
    }
}

fn author_rows(submission: &Submission) -> String {
    let mut rows = String::new();
    if let Some(name) = submission.name() {
        rows.push_str(&format!("<p><strong>Name:</strong> {}</p>\n", escape_html(name)));
        if let Some(email) = submission.email() {
            rows.push_str(&format!(
                "<p><strong>Email:</strong> {}</p>\n",
                escape_html(email)
            ));
        }
    }
    rows
}

fn dashboard_link(url: &str) -> String {
    format!(
        "<p><a href=\"{}\" style=\"background: #fbbf24; color: #000; padding: 12px 24px; text-decoration: none; border-radius: 6px;\">View in Dashboard</a></p>\n",
        escape_html(url)
    )
}

/// Escapes text for inclusion in HTML element content or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
