use super::{PublicStorageClient, StorageError, StorageUploadRequest, StorageVendor};

/// Azure Blob Storage variant; neither operation is available yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct AzurePublicStorage;

impl PublicStorageClient for AzurePublicStorage {
    fn vendor(&self) -> StorageVendor {
        StorageVendor::Azure
    }

    // TODO: issue blob SAS upload URLs once the container layout for public files is settled.
    fn signed_upload_request(
        &self,
        _file_key: &str,
        _success_redirect: &str,
    ) -> Result<StorageUploadRequest, StorageError> {
        Err(StorageError::Unsupported {
            vendor: StorageVendor::Azure,
            operation: "signed_upload_request",
        })
    }

    fn public_display_url(&self, _file_key: &str) -> Result<String, StorageError> {
        Err(StorageError::Unsupported {
            vendor: StorageVendor::Azure,
            operation: "public_display_url",
        })
    }
}
