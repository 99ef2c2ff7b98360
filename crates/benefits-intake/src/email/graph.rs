use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use super::{MailTransport, MailTransportError, OutboundEmail};
use crate::config::GraphCredentials;

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const DEFAULT_GRAPH: &str = "https://graph.microsoft.com";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    pub message: GraphMessage,
    pub save_to_sent_items: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMessage {
    pub subject: String,
    pub body: GraphItemBody,
    pub from: GraphRecipient,
    pub to_recipients: Vec<GraphRecipient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphItemBody {
    pub content_type: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRecipient {
    pub email_address: GraphEmailAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEmailAddress {
    pub address: String,
}

impl GraphRecipient {
    fn new(address: &str) -> Self {
        Self {
            email_address: GraphEmailAddress {
                address: address.to_string(),
            },
        }
    }
}

impl From<&OutboundEmail> for SendMailRequest {
    fn from(email: &OutboundEmail) -> Self {
        Self {
            message: GraphMessage {
                subject: email.subject.clone(),
                body: GraphItemBody {
                    content_type: "Text",
                    content: email.body.clone(),
                },
                from: GraphRecipient::new(&email.from),
                to_recipients: email.to.iter().map(|to| GraphRecipient::new(to)).collect(),
            },
            save_to_sent_items: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Microsoft Graph `sendMail` using an app-only client-credentials token.
pub struct GraphMailTransport {
    client: reqwest::Client,
    credentials: GraphCredentials,
    sender: String,
    authority_url: String,
    graph_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for GraphMailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphMailTransport")
            .field("sender", &self.sender)
            .field("authority_url", &self.authority_url)
            .field("graph_url", &self.graph_url)
            .finish_non_exhaustive()
    }
}

impl GraphMailTransport {
    pub fn new(credentials: GraphCredentials, sender: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            sender: sender.into(),
            authority_url: DEFAULT_AUTHORITY.to_string(),
            graph_url: DEFAULT_GRAPH.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Override the identity and Graph hosts (sovereign clouds, local fakes).
    pub fn with_endpoints(self, authority_url: impl Into<String>, graph_url: impl Into<String>) -> Self {
        Self {
            authority_url: authority_url.into(),
            graph_url: graph_url.into(),
            ..self
        }
    }

    fn endpoint(base: &str, segments: &[&str]) -> Result<Url, MailTransportError> {
        let mut url = Url::parse(base)
            .map_err(|err| MailTransportError::Configuration(format!("{base}: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| MailTransportError::Configuration(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn access_token(&self) -> Result<String, MailTransportError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at > now {
                return Ok(token.value.clone());
            }
        }

        let url = Self::endpoint(
            &self.authority_url,
            &[self.credentials.tenant_id.as_str(), "oauth2", "v2.0", "token"],
        )?;
        let response = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
            ])
            .send()
            .await
            .map_err(|err| MailTransportError::Network(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(MailTransportError::Auth(format!("{status}: {detail}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| MailTransportError::Auth(format!("unreadable token response: {err}")))?;

        let lifetime = (token.expires_in - TOKEN_REFRESH_MARGIN_SECS).max(0);
        let expires_at = now + chrono::Duration::seconds(lifetime);
        debug!(%expires_at, "acquired graph access token");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });
        Ok(token.access_token)
    }
}

#[async_trait]
impl MailTransport for GraphMailTransport {
    fn provider(&self) -> &'static str {
        "graph"
    }

    async fn deliver(&self, email: &OutboundEmail) -> Result<(), MailTransportError> {
        let token = self.access_token().await?;
        let url = Self::endpoint(
            &self.graph_url,
            &["v1.0", "users", self.sender.as_str(), "sendMail"],
        )?;

        let response = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(token)
            .json(&SendMailRequest::from(email))
            .send()
            .await
            .map_err(|err| MailTransportError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(MailTransportError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
