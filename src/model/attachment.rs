//! Attachments queued for upload.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A file queued for upload alongside the run's logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub attachment_type: String,
    pub name: String,
    pub path: PathBuf,
}
