//! Application state for the API server.

use std::sync::Arc;

use veil_core::alerts::DEFAULT_DASHBOARD_URL;
use veil_core::ContentModerator;
use veil_storage::Database;

use crate::mailer::{AlertSender, LogMailer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Arc<Database>,
    /// Content moderator (read-only after construction).
    pub moderator: Arc<ContentModerator>,
    /// Operator alert delivery.
    pub mailer: Arc<dyn AlertSender>,
    /// Dashboard link included in alerts.
    pub dashboard_url: String,
    /// Include failure details in 500 responses (development only).
    pub expose_error_details: bool,
}

impl AppState {
    /// Creates application state with the built-in moderator and a logging mailer.
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(db),
            moderator: Arc::new(ContentModerator::shared().clone()),
            mailer: Arc::new(LogMailer),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            expose_error_details: false,
        }
    }

    /// Creates application state with default in-memory database.
    pub fn in_memory() -> Self {
        Self::new(Database::in_memory().expect("Failed to create in-memory database"))
    }

    /// Replaces the moderator, e.g. one built from a custom pattern file.
    pub fn with_moderator(mut self, moderator: ContentModerator) -> Self {
        self.moderator = Arc::new(moderator);
        self
    }

    /// Replaces the alert sender.
    pub fn with_mailer(mut self, mailer: Arc<dyn AlertSender>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn with_dashboard_url(mut self, url: impl Into<String>) -> Self {
        self.dashboard_url = url.into();
        self
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }
}
