//! Presigned form POST to object storage.

use std::path::Path;

use medialink_core::{BucketLocation, PolicyDocument, SignedUploadPolicy, StorageReceipt, UploadError};

use crate::transport_error;

/// Client for the storage upload endpoint.
///
/// `endpoint_override` redirects the POST to an S3-compatible endpoint;
/// public URLs always keep the canonical bucket host.
#[derive(Clone, Debug)]
pub struct StorageClient {
    client: reqwest::Client,
    endpoint_override: Option<String>,
}

impl StorageClient {
    pub fn new(client: reqwest::Client, endpoint_override: Option<String>) -> Self {
        Self {
            client,
            endpoint_override,
        }
    }

    fn post_url(&self, location: BucketLocation) -> String {
        match &self.endpoint_override {
            Some(endpoint) => format!("{}/", endpoint.trim_end_matches('/')),
            None => location.post_url(),
        }
    }

    /// Submit the file under the signed policy. The policy fields are
    /// replayed verbatim alongside the binary content; any non-success
    /// status is fatal for the workflow.
    pub async fn upload(
        &self,
        location: BucketLocation,
        policy: &SignedUploadPolicy,
        file_path: &Path,
        content_type: &str,
    ) -> Result<StorageReceipt, UploadError> {
        // Read is scoped here so the handle is released before any await.
        let data = std::fs::read(file_path)?;
        let url = self.post_url(location);

        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(policy.file_name.clone())
            .mime_str(content_type)
            .map_err(|e| transport_error(&url, e))?;

        let form = reqwest::multipart::Form::new()
            .text("key", policy.key.clone())
            .text("content-type", content_type.to_string())
            .text("success_action_status", "200")
            .text("acl", "private")
            .text("x-amz-meta-qqfilename", policy.file_name.clone())
            .text("policy", policy.policy.clone())
            .text("x-amz-algorithm", PolicyDocument::algorithm())
            .text("x-amz-credential", policy.credential.clone())
            .text("x-amz-date", policy.amz_date.clone())
            .text("x-amz-signature", policy.signature.clone())
            .part("file", file_part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Service {
                endpoint: url,
                status: status.as_u16(),
                body,
            });
        }

        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        tracing::info!(
            key = %policy.key,
            bucket = %location.bucket,
            etag = %etag,
            "object uploaded"
        );
        Ok(StorageReceipt { etag })
    }
}
