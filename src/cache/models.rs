//! Cached value types and cache statistics.

// Author: kelexine (https://github.com/kelexine)

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Last-change information for a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub author: String,
    pub updated_on: DateTime<Utc>,
}

/// File content as returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Blob(Bytes),
}

impl FileContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Blob(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Blob(bytes) => bytes,
        }
    }
}

/// A value held by a [`KeyValueStore`](super::KeyValueStore).
///
/// Serialized as `{"type": "text" | "blob" | "metadata", "value": ...}` with
/// blobs base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StoredValue", try_from = "StoredValue")]
pub enum CachedValue {
    Text(String),
    Blob(Bytes),
    Metadata(FileMetadata),
}

/// On-disk form of [`CachedValue`].
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum StoredValue {
    Text(String),
    Blob(String),
    Metadata(FileMetadata),
}

impl From<CachedValue> for StoredValue {
    fn from(value: CachedValue) -> Self {
        match value {
            CachedValue::Text(text) => StoredValue::Text(text),
            CachedValue::Blob(bytes) => StoredValue::Blob(STANDARD.encode(bytes)),
            CachedValue::Metadata(metadata) => StoredValue::Metadata(metadata),
        }
    }
}

impl TryFrom<StoredValue> for CachedValue {
    type Error = base64::DecodeError;

    fn try_from(value: StoredValue) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            StoredValue::Text(text) => CachedValue::Text(text),
            StoredValue::Blob(encoded) => CachedValue::Blob(Bytes::from(STANDARD.decode(encoded)?)),
            StoredValue::Metadata(metadata) => CachedValue::Metadata(metadata),
        })
    }
}

impl CachedValue {
    /// Whether a stored value counts as a hit. Empty text does not.
    pub fn is_present(&self) -> bool {
        match self {
            CachedValue::Text(text) => !text.is_empty(),
            CachedValue::Blob(_) | CachedValue::Metadata(_) => true,
        }
    }
}

impl From<FileContent> for CachedValue {
    fn from(content: FileContent) -> Self {
        match content {
            FileContent::Text(text) => CachedValue::Text(text),
            FileContent::Blob(bytes) => CachedValue::Blob(bytes),
        }
    }
}

impl From<FileMetadata> for CachedValue {
    fn from(metadata: FileMetadata) -> Self {
        CachedValue::Metadata(metadata)
    }
}

impl TryFrom<CachedValue> for FileContent {
    type Error = ApiError;

    fn try_from(value: CachedValue) -> Result<Self> {
        match value {
            CachedValue::Text(text) => Ok(FileContent::Text(text)),
            CachedValue::Blob(bytes) => Ok(FileContent::Blob(bytes)),
            CachedValue::Metadata(_) => Err(ApiError::Store(
                "expected file content, found metadata".to_string(),
            )),
        }
    }
}

impl TryFrom<CachedValue> for FileMetadata {
    type Error = ApiError;

    fn try_from(value: CachedValue) -> Result<Self> {
        match value {
            CachedValue::Metadata(metadata) => Ok(metadata),
            _ => Err(ApiError::Store(
                "expected metadata, found file content".to_string(),
            )),
        }
    }
}

/// Statistics for content cache lookups.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Lookups answered from the store.
    pub hits: u64,
    /// Lookups that fetched and stored a value.
    pub misses: u64,
    /// Reads without an id, which skip the store.
    pub bypasses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_presence() {
        assert!(!CachedValue::Text(String::new()).is_present());
        assert!(CachedValue::Text("x".to_string()).is_present());
        assert!(CachedValue::Blob(Bytes::new()).is_present());
    }

    #[test]
    fn test_metadata_json_shape() {
        let metadata = FileMetadata {
            author: "octocat".to_string(),
            updated_on: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(CachedValue::from(metadata.clone())).unwrap();
        assert_eq!(json["type"], "metadata");
        assert_eq!(json["value"]["author"], "octocat");
        assert_eq!(json["value"]["updatedOn"], "2024-05-01T12:00:00Z");

        let back: CachedValue = serde_json::from_value(json).unwrap();
        assert_eq!(FileMetadata::try_from(back).unwrap(), metadata);
    }

    #[test]
    fn test_blob_is_stored_as_base64() {
        let json = serde_json::to_value(CachedValue::Blob(Bytes::from_static(b"\x89PNG"))).unwrap();
        assert_eq!(json["type"], "blob");
        assert_eq!(json["value"], "iVBORw==");

        let back: CachedValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, CachedValue::Blob(Bytes::from_static(b"\x89PNG")));
    }

    #[test]
    fn test_invalid_base64_blob_is_rejected() {
        let result = serde_json::from_str::<CachedValue>(r#"{"type": "blob", "value": "not base64!"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_kind_is_a_store_error() {
        let value = CachedValue::Text("hello".to_string());
        assert!(matches!(FileMetadata::try_from(value), Err(ApiError::Store(_))));
    }
}
