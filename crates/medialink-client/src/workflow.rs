//! The sequential upload pipeline.
//!
//! Ordering: file existence and access-key presence are checked before
//! any network call, then signature, storage upload, and registration
//! run strictly in sequence. Failure at any step aborts the rest; steps
//! already completed are never rolled back, so a registration or record
//! update failure leaves the object uploaded but unregistered. That
//! condition is surfaced as `InconsistentState`, not reconciled.

use chrono::Utc;
use medialink_core::{
    BucketLocation, ClientConfig, RecordField, UploadError, UploadResult, UploadTarget,
};

use crate::records::RecordsClient;
use crate::storage::StorageClient;
use crate::transport_error;

pub struct UploadWorkflow {
    records: RecordsClient,
    storage: StorageClient,
    access_key_id: Option<String>,
}

impl UploadWorkflow {
    pub fn new(config: &ClientConfig) -> Result<Self, UploadError> {
        let records = RecordsClient::new(config)?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| transport_error(&config.base_url, e))?;
        let storage = StorageClient::new(http, config.storage_endpoint.clone());

        Ok(Self {
            records,
            storage,
            access_key_id: config.access_key_id.clone(),
        })
    }

    /// The underlying records client, for the standalone connectivity probe.
    pub fn records(&self) -> &RecordsClient {
        &self.records
    }

    /// Upload one file to storage and register it with the records
    /// service. Returns the registered id, object key, public URL, and
    /// local file size.
    pub async fn run(&self, target: &UploadTarget) -> Result<UploadResult, UploadError> {
        if !target.file_path.exists() {
            return Err(UploadError::FileNotFound(target.file_path.clone()));
        }
        let access_key_id = self
            .access_key_id
            .as_deref()
            .ok_or(UploadError::CredentialMissing)?;

        let file_name = target
            .file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size_bytes = std::fs::metadata(&target.file_path)?.len();
        let location = BucketLocation::for_environment(target.environment);

        let policy = self
            .records
            .request_signature(
                &file_name,
                &target.content_type,
                location,
                access_key_id,
                Utc::now(),
            )
            .await?;

        let receipt = self
            .storage
            .upload(location, &policy, &target.file_path, &target.content_type)
            .await?;

        // The object is in storage from here on; registration failure
        // leaves it orphaned at a URL that is already known.
        let url = location.public_url(&policy.key);
        let registered = self
            .records
            .register_upload(&policy, location, &receipt.etag, &target.source)
            .await
            .map_err(|e| UploadError::InconsistentState {
                stage: "registration",
                key: policy.key.clone(),
                url: url.clone(),
                source: Box::new(e),
            })?;

        Ok(UploadResult {
            id: registered.id,
            key: registered.key,
            url,
            size_bytes,
        })
    }

    /// Attach a completed upload to a record: the link field receives
    /// the public URL, the file field a single-element id list.
    pub async fn attach_to_record(
        &self,
        record_type: &str,
        record_id: &str,
        result: &UploadResult,
        link_field: &str,
        file_field: &str,
    ) -> Result<serde_json::Value, UploadError> {
        let fields = vec![
            RecordField::link(link_field, &result.url),
            RecordField::file_reference(file_field, &result.id),
        ];

        self.records
            .update_record(record_type, record_id, fields)
            .await
            .map_err(|e| UploadError::InconsistentState {
                stage: "record update",
                key: result.key.clone(),
                url: result.url.clone(),
                source: Box::new(e),
            })
    }
}
