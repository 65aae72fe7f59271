//! Records service client.
//!
//! Every request carries the X-API-Key, X-User-Id, and X-Business-Id
//! identity headers. Non-success responses surface as `Service` errors
//! carrying the endpoint, status, and body for operator diagnosis; the
//! connectivity probe is the one call that never raises.

use chrono::{DateTime, Utc};
use medialink_core::{
    BucketLocation, ClientConfig, PolicyDocument, RecordField, RegisteredFile, SignatureResponse,
    SignedUploadPolicy, UploadError,
};

use crate::transport_error;

#[derive(Clone, Debug)]
pub struct RecordsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    user_id: String,
    business_id: String,
}

impl RecordsClient {
    pub fn new(config: &ClientConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| transport_error(&config.base_url, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
            business_id: config.business_id.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-API-Key", self.api_key.as_str())
            .header("X-User-Id", self.user_id.as_str())
            .header("X-Business-Id", self.business_id.as_str())
    }

    /// Read the response body and map non-success statuses to a
    /// `Service` error for the given endpoint.
    async fn read_body(url: &str, response: reqwest::Response) -> Result<String, UploadError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(url, e))?;
        if !status.is_success() {
            return Err(UploadError::Service {
                endpoint: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Connectivity probe against the listing endpoint.
    ///
    /// Advisory only: transport failures and non-200 statuses are logged
    /// and reported as `false`, never raised.
    pub async fn check_connection(&self) -> bool {
        let url = self.build_url("/client/v2");
        let request = self.apply_auth(
            self.client
                .post(&url)
                .json(&serde_json::json!({ "page_size": 50, "page": 1 })),
        );

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    tracing::info!(endpoint = %url, "records service reachable");
                    true
                } else {
                    let body = response.text().await.unwrap_or_default();
                    tracing::warn!(
                        endpoint = %url,
                        status = status.as_u16(),
                        body = %body,
                        "connectivity probe failed"
                    );
                    false
                }
            }
            Err(e) => {
                tracing::warn!(endpoint = %url, error = %e, "connectivity probe failed");
                false
            }
        }
    }

    /// Assemble the policy document and have the records service
    /// countersign it. The upload must not proceed without a signature,
    /// so any failure here propagates.
    pub async fn request_signature(
        &self,
        file_name: &str,
        content_type: &str,
        location: BucketLocation,
        access_key_id: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<SignedUploadPolicy, UploadError> {
        let document =
            PolicyDocument::new(file_name, content_type, location, access_key_id, issued_at);

        let url = self.build_url("/s3/signature");
        let request = self.apply_auth(self.client.post(&url).json(&document.body));
        let response = request.send().await.map_err(|e| transport_error(&url, e))?;
        let body = Self::read_body(&url, response).await?;
        let signed: SignatureResponse = serde_json::from_str(&body)?;

        tracing::info!(
            key = %document.key,
            bucket = %location.bucket,
            expires_at = %document.expires_at,
            "upload policy issued"
        );
        Ok(SignedUploadPolicy::from_parts(document, signed))
    }

    /// Register the now-uploaded object with the records service.
    pub async fn register_upload(
        &self,
        policy: &SignedUploadPolicy,
        location: BucketLocation,
        etag: &str,
        source: &str,
    ) -> Result<RegisteredFile, UploadError> {
        let url = self.build_url("/s3/success");
        let form = [
            ("key", policy.key.as_str()),
            ("uuid", policy.key_stem()),
            ("name", policy.file_name.as_str()),
            ("bucket", location.bucket),
            ("etag", etag),
            ("is_public", "False"),
        ];
        let request = self.apply_auth(
            self.client
                .post(&url)
                .query(&[("source", source)])
                .form(&form),
        );
        let response = request.send().await.map_err(|e| transport_error(&url, e))?;
        let body = Self::read_body(&url, response).await?;
        let registered: RegisteredFile = serde_json::from_str(&body)?;

        tracing::info!(id = %registered.id, key = %registered.key, "upload registered");
        Ok(registered)
    }

    /// Partial update of a record's fields.
    pub async fn update_record(
        &self,
        record_type: &str,
        record_id: &str,
        fields: Vec<RecordField>,
    ) -> Result<serde_json::Value, UploadError> {
        let url = self.build_url(&format!("/records/{}/{}", record_type, record_id));
        let request = self.apply_auth(
            self.client
                .put(&url)
                .json(&serde_json::json!({ "fields": fields })),
        );
        let response = request.send().await.map_err(|e| transport_error(&url, e))?;
        let body = Self::read_body(&url, response).await?;
        let updated: serde_json::Value = serde_json::from_str(&body)?;

        tracing::info!(record_type, record_id, "record updated");
        Ok(updated)
    }
}
