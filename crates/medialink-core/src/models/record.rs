//! Record field updates.

use serde::Serialize;

/// One field assignment in a partial record update.
#[derive(Clone, Debug, Serialize)]
pub struct RecordField {
    pub name: String,
    pub value: serde_json::Value,
}

impl RecordField {
    /// Link field holding the object's public URL.
    pub fn link(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            value: serde_json::Value::String(url.to_string()),
        }
    }

    /// File reference field: a single-element list of file ids.
    pub fn file_reference(name: &str, file_id: &str) -> Self {
        Self {
            name: name.to_string(),
            value: serde_json::json!([file_id]),
        }
    }
}
