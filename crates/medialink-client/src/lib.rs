//! HTTP client for the records service and object storage.
//!
//! `RecordsClient` covers the records service endpoints (connectivity
//! probe, policy signing, upload registration, record update).
//! `StorageClient` performs the presigned form POST to object storage.
//! `UploadWorkflow` runs the sequential pipeline over both.

pub mod records;
pub mod storage;
pub mod workflow;

pub use records::RecordsClient;
pub use storage::StorageClient;
pub use workflow::UploadWorkflow;

use medialink_core::UploadError;

pub(crate) fn transport_error(endpoint: &str, err: reqwest::Error) -> UploadError {
    UploadError::Transport {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    }
}
