//! Upload request and result payloads.
//!
//! Each value is produced by one workflow step and consumed by the next;
//! nothing here is mutated after construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::bucket::Environment;

/// One file to push to storage. Created by the caller, consumed once.
#[derive(Clone, Debug)]
pub struct UploadTarget {
    pub file_path: PathBuf,
    pub content_type: String,
    pub environment: Environment,
    /// Attribution tag forwarded to the registration endpoint.
    pub source: String,
}

/// Metadata read back from the storage response.
#[derive(Clone, Debug, Default)]
pub struct StorageReceipt {
    /// ETag header value; empty when the provider omits it.
    pub etag: String,
}

/// Response from the registration endpoint.
#[derive(Debug, Deserialize)]
pub struct RegisteredFile {
    pub id: String,
    pub key: String,
}

/// Outcome of a completed workflow run.
#[derive(Clone, Debug, Serialize)]
pub struct UploadResult {
    /// File id assigned by the records service.
    pub id: String,
    /// Storage object key.
    pub key: String,
    /// Public object URL.
    pub url: String,
    /// Local file size in bytes.
    pub size_bytes: u64,
}
