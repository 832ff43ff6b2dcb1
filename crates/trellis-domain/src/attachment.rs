use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AttachmentId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub is_upload: bool,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Attachment {
    /// Human readable size, e.g. `12.5 KB`.
    pub fn size_label(&self) -> Option<String> {
        let bytes = self.bytes?;
        let label = if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        };
        Some(label)
    }
}
