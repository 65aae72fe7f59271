//! Environment tags and storage bucket resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// Deployment target selecting which bucket/region pair an upload goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Staging,
    Go,
    Fmo,
    Testing,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Go => "go",
            Environment::Fmo => "fmo",
            Environment::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staging" => Ok(Environment::Staging),
            "go" => Ok(Environment::Go),
            "fmo" => Ok(Environment::Fmo),
            "testing" => Ok(Environment::Testing),
            other => Err(UploadError::InvalidEnvironment(other.to_string())),
        }
    }
}

/// Resolved bucket/region pair. A pure function of the environment tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketLocation {
    pub bucket: &'static str,
    pub region: &'static str,
}

impl BucketLocation {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Staging => BucketLocation {
                bucket: "staging-file-cdn",
                region: "us-east-1",
            },
            Environment::Go => BucketLocation {
                bucket: "kizen-file-cdn",
                region: "us-east-1",
            },
            Environment::Fmo => BucketLocation {
                bucket: "fmo-file-cdn",
                region: "us-east-2",
            },
            Environment::Testing => BucketLocation {
                bucket: "sfdc-data-cloud",
                region: "us-east-1",
            },
        }
    }

    /// Form POST endpoint for the bucket.
    pub fn post_url(&self) -> String {
        format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region)
    }

    /// Public URL for an object in this bucket.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}
