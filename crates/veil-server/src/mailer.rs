//! Operator alert delivery.
//!
//! Alerts are sent in the background: a slow or failing mail relay never
//! delays or fails the response to the submitter.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use veil_core::alerts::{Alert, AlertKind};

/// Errors raised while delivering an alert.
#[derive(Debug, Error)]
pub enum MailError {
    /// The relay could not be reached.
    #[error("mail relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("mail relay returned HTTP {0}")]
    Status(u16),

    /// No recipient is configured for this alert kind.
    #[error("no recipient configured for {0:?} alerts")]
    NoRecipient(AlertKind),
}

/// Delivers rendered alerts to the site operators.
#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<(), MailError>;
}

/// Mail relay settings.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Relay endpoint accepting `{from, to, subject, html}` JSON.
    pub endpoint: String,
    /// Bearer token for the relay.
    pub api_key: Option<String>,
    /// Sender address.
    pub from: String,
    /// Recipient for urgent alerts.
    pub admin_email: Option<String>,
    /// Recipient for review notices.
    pub info_email: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Sends alerts through an HTTP mail relay.
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn recipient(&self, kind: AlertKind) -> Option<&str> {
        match kind {
            AlertKind::Urgent => self.config.admin_email.as_deref(),
            AlertKind::Review => self
                .config
                .info_email
                .as_deref()
                .or(self.config.admin_email.as_deref()),
        }
    }
}

#[async_trait]
impl AlertSender for HttpMailer {
    async fn send(&self, alert: &Alert) -> Result<(), MailError> {
        let to = self
            .recipient(alert.kind)
            .ok_or(MailError::NoRecipient(alert.kind))?;

        let mut request = self.client.post(&self.config.endpoint).json(&OutgoingMail {
            from: &self.config.from,
            to,
            subject: &alert.subject,
            html: &alert.html,
        });
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Status(response.status().as_u16()));
        }

        info!(kind = ?alert.kind, "Alert delivered");
        Ok(())
    }
}

/// Logs alerts instead of sending them. Used when no relay is configured.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl AlertSender for LogMailer {
    async fn send(&self, alert: &Alert) -> Result<(), MailError> {
        match alert.kind {
            AlertKind::Urgent => warn!(subject = %alert.subject, "Urgent alert (no mail relay configured)"),
            AlertKind::Review => info!(subject = %alert.subject, "Review notice (no mail relay configured)"),
        }
        Ok(())
    }
}

/// Spawns delivery of `alert` on the runtime and returns immediately.
pub fn dispatch_in_background(sender: Arc<dyn AlertSender>, alert: Alert) {
    tokio::spawn(async move {
        debug!(kind = ?alert.kind, "Dispatching alert");
        if let Err(e) = sender.send(&alert).await {
            warn!(error = %e, kind = ?alert.kind, "Background alert delivery failed (non-critical)");
        }
    });
}
