//! Public file storage clients, one per cloud vendor.

mod aws;
mod azure;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use aws::AwsPublicStorage;
pub use azure::AzurePublicStorage;

use crate::config::{StorageConfig, StorageProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageVendor {
    Aws,
    Azure,
}

impl fmt::Display for StorageVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageVendor::Aws => f.write_str("aws"),
            StorageVendor::Azure => f.write_str("azure"),
        }
    }
}

/// Everything a browser needs to upload a file straight to the vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageUploadRequest {
    pub vendor: StorageVendor,
    pub action_url: String,
    pub file_key: String,
    pub success_action_redirect: String,
    pub expires_at: DateTime<Utc>,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("{operation} is not implemented for {vendor} storage")]
    Unsupported {
        vendor: StorageVendor,
        operation: &'static str,
    },
    #[error("invalid file key '{0}'")]
    InvalidKey(String),
    #[error("invalid storage endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("storage credentials are not configured for {0}")]
    MissingCredentials(StorageVendor),
}

impl StorageError {
    /// Configuration problems are fatal to the calling flow and never worth retrying.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            StorageError::Unsupported { .. }
                | StorageError::MissingCredentials(_)
                | StorageError::InvalidEndpoint(_)
        )
    }
}

/// Issues upload descriptors and display URLs for publicly readable files.
pub trait PublicStorageClient: Send + Sync {
    fn vendor(&self) -> StorageVendor;

    fn signed_upload_request(
        &self,
        file_key: &str,
        success_redirect: &str,
    ) -> Result<StorageUploadRequest, StorageError>;

    fn public_display_url(&self, file_key: &str) -> Result<String, StorageError>;
}

pub fn public_storage_from_config(config: &StorageConfig) -> Arc<dyn PublicStorageClient> {
    match config.provider {
        StorageProvider::Aws => Arc::new(AwsPublicStorage::from_config(config)),
        StorageProvider::Azure => Arc::new(AzurePublicStorage),
    }
}

pub(crate) fn validate_file_key(file_key: &str) -> Result<(), StorageError> {
    let invalid = file_key.trim().is_empty()
        || file_key.starts_with('/')
        || file_key.split('/').any(|segment| segment == "..")
        || file_key.chars().any(char::is_control);
    if invalid {
        return Err(StorageError::InvalidKey(file_key.to_string()));
    }
    Ok(())
}
