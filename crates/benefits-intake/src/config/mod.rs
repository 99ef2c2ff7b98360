use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_SENDER_ADDRESS: &str = "no-reply@localhost";
const DEFAULT_PUBLIC_BUCKET: &str = "civic-public-files";
const DEFAULT_REGION: &str = "us-east-1";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Staging,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "staging" | "stage" => Self::Staging,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Only production delivers real email content to real recipients.
    pub const fn is_prod(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub email: EmailConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            email: EmailConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Outbound email settings.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub sender_address: String,
    pub graph: Option<GraphCredentials>,
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let sender_address = env::var("EMAIL_SENDER_ADDRESS")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER_ADDRESS.to_string());

        let tenant_id = non_empty_var("GRAPH_TENANT_ID");
        let client_id = non_empty_var("GRAPH_CLIENT_ID");
        let client_secret = non_empty_var("GRAPH_CLIENT_SECRET");

        let graph = match (tenant_id, client_id, client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Some(GraphCredentials {
                tenant_id,
                client_id,
                client_secret,
            }),
            (None, None, None) => None,
            _ => return Err(ConfigError::IncompleteGraphCredentials),
        };

        Ok(Self {
            sender_address,
            graph,
        })
    }
}

/// App-only credentials for the Microsoft Graph mail API.
#[derive(Clone)]
pub struct GraphCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for GraphCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Cloud vendor backing public file storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Aws,
    Azure,
}

impl StorageProvider {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "aws" | "s3" => Ok(Self::Aws),
            "azure" => Ok(Self::Azure),
            other => Err(ConfigError::UnknownStorageProvider(other.to_string())),
        }
    }
}

/// Public file storage settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub region: String,
    pub credentials: Option<AwsCredentials>,
    pub upload_expiry_secs: u64,
    pub file_limit_mb: u64,
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let provider = StorageProvider::parse(
            &env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "aws".to_string()),
        )?;
        let bucket =
            non_empty_var("AWS_S3_PUBLIC_BUCKET").unwrap_or_else(|| DEFAULT_PUBLIC_BUCKET.into());
        let region = non_empty_var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.into());

        let credentials = match (
            non_empty_var("AWS_ACCESS_KEY_ID"),
            non_empty_var("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                access_key_id,
                secret_access_key,
                session_token: non_empty_var("AWS_SESSION_TOKEN"),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteAwsCredentials),
        };

        let upload_expiry_secs = parse_u64("STORAGE_UPLOAD_EXPIRY_SECS", 600)?;
        let file_limit_mb = parse_u64("STORAGE_FILE_LIMIT_MB", 10)?;

        Ok(Self {
            provider,
            bucket,
            region,
            credentials,
            upload_expiry_secs,
            file_limit_mb,
        })
    }

    pub fn file_limit_bytes(&self) -> u64 {
        self.file_limit_mb.saturating_mul(1024 * 1024)
    }
}

/// Access key pair used to sign S3 upload policies.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("session_token", &self.session_token.is_some())
            .finish_non_exhaustive()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { name }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str },
    UnknownStorageProvider(String),
    IncompleteGraphCredentials,
    IncompleteAwsCredentials,
    MissingMailTransport,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name } => {
                write!(f, "{name} must be a non-negative integer")
            }
            ConfigError::UnknownStorageProvider(value) => {
                write!(f, "STORAGE_PROVIDER '{value}' is not one of aws, azure")
            }
            ConfigError::IncompleteGraphCredentials => write!(
                f,
                "GRAPH_TENANT_ID, GRAPH_CLIENT_ID and GRAPH_CLIENT_SECRET must be set together"
            ),
            ConfigError::IncompleteAwsCredentials => write!(
                f,
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together"
            ),
            ConfigError::MissingMailTransport => {
                write!(f, "production requires Graph mail credentials")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::UnknownStorageProvider(_)
            | ConfigError::IncompleteGraphCredentials
            | ConfigError::IncompleteAwsCredentials
            | ConfigError::MissingMailTransport => None,
        }
    }
}
