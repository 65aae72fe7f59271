//! Error types module
//!
//! All workflow failures surface as `UploadError`. Configuration and
//! input-validation errors fail before any network call; transport and
//! service errors abort the remaining sequence. `InconsistentState`
//! marks the accepted gap where the object reached storage but the
//! records service was never told about it.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Missing configuration value: {0}")]
    ConfigurationMissing(String),

    #[error("Unsupported environment: {0}")]
    InvalidEnvironment(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No storage access key id supplied")]
    CredentialMissing,

    #[error("Transport error calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned status {status}: {body}")]
    Service {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Object {key} uploaded but {stage} failed; object remains at {url}")]
    InconsistentState {
        stage: &'static str,
        key: String,
        url: String,
        #[source]
        source: Box<UploadError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid response payload: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl UploadError {
    /// Error type name for diagnostics.
    pub fn error_type(&self) -> &'static str {
        match self {
            UploadError::ConfigurationMissing(_) => "ConfigurationMissing",
            UploadError::InvalidEnvironment(_) => "InvalidEnvironment",
            UploadError::FileNotFound(_) => "FileNotFound",
            UploadError::CredentialMissing => "CredentialMissing",
            UploadError::Transport { .. } => "Transport",
            UploadError::Service { .. } => "Service",
            UploadError::InconsistentState { .. } => "InconsistentState",
            UploadError::Io(_) => "Io",
            UploadError::InvalidResponse(_) => "InvalidResponse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_carries_endpoint_status_and_body() {
        let err = UploadError::Service {
            endpoint: "https://api.example.com/s3/signature".to_string(),
            status: 403,
            body: "{\"detail\":\"forbidden\"}".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("https://api.example.com/s3/signature"));
        assert!(rendered.contains("403"));
        assert!(rendered.contains("forbidden"));
    }

    #[test]
    fn inconsistent_state_names_stage_and_url() {
        let err = UploadError::InconsistentState {
            stage: "registration",
            key: "abc.mp3".to_string(),
            url: "https://fmo-file-cdn.s3.us-east-2.amazonaws.com/abc.mp3".to_string(),
            source: Box::new(UploadError::Service {
                endpoint: "https://api.example.com/s3/success".to_string(),
                status: 500,
                body: "oops".to_string(),
            }),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("registration"));
        assert!(rendered.contains("abc.mp3"));
        assert_eq!(err.error_type(), "InconsistentState");
        assert!(std::error::Error::source(&err).is_some());
    }
}
