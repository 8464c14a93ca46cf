//! Types for storage operations

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A file in a storage bucket, as returned by remove
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    /// The file name
    pub name: String,

    /// The bucket ID
    pub bucket_id: Option<String>,

    /// The file ID
    pub id: Option<String>,

    /// File metadata
    pub metadata: Option<serde_json::Value>,
}

/// Response for an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// `{bucket}/{path}`
    #[serde(rename = "Key")]
    pub key: String,

    #[serde(rename = "Id", default)]
    pub id: Option<String>,
}

/// An object's bytes together with the type it was stored as
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Options for uploading a file
#[derive(Debug, Clone)]
pub struct FileOptions {
    /// Cache control max-age in seconds
    pub cache_control: String,

    /// Content type of the file
    pub content_type: Option<String>,

    /// Whether to overwrite an existing object
    pub upsert: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            cache_control: "3600".to_string(),
            content_type: None,
            upsert: false,
        }
    }
}

impl FileOptions {
    pub fn with_content_type(mut self, content_type: Option<&str>) -> Self {
        self.content_type = content_type.map(str::to_string);
        self
    }

    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}
