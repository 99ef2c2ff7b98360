use async_trait::async_trait;
use tracing::info;

use super::{MailTransport, MailTransportError, OutboundEmail};

/// Development transport: logs the envelope instead of contacting a vendor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    fn provider(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, email: &OutboundEmail) -> Result<(), MailTransportError> {
        info!(
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            body_chars = email.body.chars().count(),
            "email delivery skipped; no mail provider configured"
        );
        Ok(())
    }
}
