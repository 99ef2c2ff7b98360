use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    Success,
    Failure,
}

impl SendOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            SendOutcome::Success => "success",
            SendOutcome::Failure => "failure",
        }
    }
}

/// Sink for per-attempt email send outcomes.
pub trait EmailSendMetrics: Send + Sync {
    fn record(&self, provider: &str, outcome: SendOutcome, elapsed: Duration);
}

/// Records through the `metrics` facade; the service's Prometheus recorder exports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusEmailSendMetrics;

impl PrometheusEmailSendMetrics {
    pub const SEND_TOTAL: &'static str = "email_send_total";
    pub const SEND_DURATION: &'static str = "email_send_duration_seconds";
}

impl EmailSendMetrics for PrometheusEmailSendMetrics {
    fn record(&self, provider: &str, outcome: SendOutcome, elapsed: Duration) {
        ::metrics::counter!(
            Self::SEND_TOTAL,
            "provider" => provider.to_string(),
            "outcome" => outcome.label()
        )
        .increment(1);
        ::metrics::histogram!(Self::SEND_DURATION, "provider" => provider.to_string())
            .record(elapsed.as_secs_f64());
    }
}
