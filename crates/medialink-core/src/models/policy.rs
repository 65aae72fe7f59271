//! Signed upload policy assembly.
//!
//! The client only assembles the unsigned policy document; the records
//! service is the trust boundary that signs it. All timestamps derive
//! from a single issuance instant, in UTC.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::bucket::BucketLocation;

/// Policies expire this long after issuance.
const POLICY_TTL_MINUTES: i64 = 5;
/// Upper bound of the policy's content-length-range condition.
const MAX_CONTENT_LENGTH_BYTES: u64 = 50_000_000;
const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Generate the object key: a fresh uuid carrying the original file
/// name's extension. A name without an extension yields a bare uuid.
pub fn generate_object_key(file_name: &str) -> String {
    let id = Uuid::new_v4();
    match std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Unsigned policy document, together with the locally computed values
/// that must be replayed on the storage upload.
#[derive(Clone, Debug)]
pub struct PolicyDocument {
    pub key: String,
    pub file_name: String,
    pub credential: String,
    pub amz_date: String,
    pub expires_at: DateTime<Utc>,
    pub body: serde_json::Value,
}

impl PolicyDocument {
    pub fn new(
        file_name: &str,
        content_type: &str,
        location: BucketLocation,
        access_key_id: &str,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let key = generate_object_key(file_name);
        let credential = format!(
            "{}/{}/{}/s3/aws4_request",
            access_key_id,
            issued_at.format("%Y%m%d"),
            location.region
        );
        let amz_date = issued_at.format("%Y%m%dT%H%M%SZ").to_string();
        let expires_at = issued_at + Duration::minutes(POLICY_TTL_MINUTES);

        let body = json!({
            "expiration": expires_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "conditions": [
                {"acl": "private"},
                {"bucket": location.bucket},
                ["starts-with", "$key", ""],
                {"content-type": content_type},
                {"success_action_status": "200"},
                {"key": &key},
                {"x-amz-meta-qqfilename": file_name},
                {"x-amz-algorithm": SIGNING_ALGORITHM},
                {"x-amz-credential": &credential},
                {"x-amz-date": &amz_date},
                ["content-length-range", "0", MAX_CONTENT_LENGTH_BYTES.to_string()]
            ]
        });

        Self {
            key,
            file_name: file_name.to_string(),
            credential,
            amz_date,
            expires_at,
            body,
        }
    }

    pub fn algorithm() -> &'static str {
        SIGNING_ALGORITHM
    }
}

/// Response from the signing endpoint. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct SignatureResponse {
    pub policy: String,
    pub signature: String,
}

/// Server-countersigned policy. Single use, valid until `expires_at`,
/// never persisted.
#[derive(Clone, Debug)]
pub struct SignedUploadPolicy {
    pub policy: String,
    pub signature: String,
    pub key: String,
    pub file_name: String,
    pub credential: String,
    pub amz_date: String,
    pub expires_at: DateTime<Utc>,
}

impl SignedUploadPolicy {
    pub fn from_parts(document: PolicyDocument, response: SignatureResponse) -> Self {
        Self {
            policy: response.policy,
            signature: response.signature,
            key: document.key,
            file_name: document.file_name,
            credential: document.credential,
            amz_date: document.amz_date,
            expires_at: document.expires_at,
        }
    }

    /// Key stem before the extension; the registration endpoint's uuid field.
    pub fn key_stem(&self) -> &str {
        self.key.split('.').next().unwrap_or(&self.key)
    }
}
