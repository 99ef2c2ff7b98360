//! Transactional email with environment-dependent content rewriting.

mod graph;
mod log_transport;
mod send_metrics;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

pub use self::graph::{GraphMailTransport, SendMailRequest};
pub use self::log_transport::LogMailTransport;
pub use self::send_metrics::{EmailSendMetrics, PrometheusEmailSendMetrics, SendOutcome};

use crate::config::AppEnvironment;

pub const TEST_SUBJECT_PREFIX: &str = "[Test Message] ";

pub const TEST_SERVER_NOTICE: &str = "This email was generated from our test server. \
The original message content has been withheld. If you were not expecting it, you can ignore it.";

/// A fully prepared message as handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Vendor mail API.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn deliver(&self, email: &OutboundEmail) -> Result<(), MailTransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailTransportError {
    #[error("mail api rejected the request with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("mail api authentication failed: {0}")]
    Auth(String),
    #[error("mail api unreachable: {0}")]
    Network(String),
    #[error("invalid mail api configuration: {0}")]
    Configuration(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error(transparent)]
    Transport(#[from] MailTransportError),
}

/// Rewrite content outside production so test runs never deliver real notices.
pub fn prepare_message(
    environment: AppEnvironment,
    from: &str,
    recipients: &BTreeSet<String>,
    subject: &str,
    body: &str,
) -> OutboundEmail {
    let (subject, body) = if environment.is_prod() {
        (subject.to_string(), body.to_string())
    } else {
        (
            format!("{TEST_SUBJECT_PREFIX}{subject}"),
            TEST_SERVER_NOTICE.to_string(),
        )
    };

    OutboundEmail {
        from: from.to_string(),
        to: recipients.iter().cloned().collect(),
        subject,
        body,
    }
}

/// Sends mail through a vendor transport and records every attempt.
#[derive(Clone)]
pub struct EmailClient {
    transport: Arc<dyn MailTransport>,
    metrics: Arc<dyn EmailSendMetrics>,
    sender: String,
    environment: AppEnvironment,
}

impl std::fmt::Debug for EmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailClient")
            .field("provider", &self.transport.provider())
            .field("sender", &self.sender)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl EmailClient {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        metrics: Arc<dyn EmailSendMetrics>,
        sender: impl Into<String>,
        environment: AppEnvironment,
    ) -> Self {
        Self {
            transport,
            metrics,
            sender: sender.into(),
            environment,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub async fn send_to(&self, address: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        self.send([address], subject, body).await
    }

    /// Blank and duplicate addresses are dropped; an empty set sends nothing.
    pub async fn send<I, S>(&self, recipients: I, subject: &str, body: &str) -> Result<(), EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let recipients: BTreeSet<String> = recipients
            .into_iter()
            .map(|address| address.as_ref().trim().to_string())
            .filter(|address| !address.is_empty())
            .collect();

        if recipients.is_empty() {
            return Ok(());
        }

        let email = prepare_message(self.environment, &self.sender, &recipients, subject, body);
        let provider = self.transport.provider();
        let started = Instant::now();
        let result = self.transport.deliver(&email).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(()) => {
                self.metrics.record(provider, SendOutcome::Success, elapsed);
                info!(provider, recipients = email.to.len(), "email sent");
            }
            Err(err) => {
                self.metrics.record(provider, SendOutcome::Failure, elapsed);
                warn!(provider, recipients = email.to.len(), error = %err, "email send failed");
            }
        }

        result.map_err(EmailError::from)
    }
}
