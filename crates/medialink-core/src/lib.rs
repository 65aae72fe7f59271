//! Medialink Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared by the client and CLI crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::UploadError;
pub use models::bucket::{BucketLocation, Environment};
pub use models::policy::{PolicyDocument, SignatureResponse, SignedUploadPolicy};
pub use models::record::RecordField;
pub use models::upload::{RegisteredFile, StorageReceipt, UploadResult, UploadTarget};
