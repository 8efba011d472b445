//! Shared types exchanged with the storage service.
//!
//! These types cross the client/service boundary as JSON, so every change
//! here is a wire-format change. Blob fields travel base64-encoded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Whether a media asset is a photo or a video.
///
/// Videos are never transformed by the client — only thumbnailed from a
/// sampled frame. Photos can additionally be edited (save-as-copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A persisted photo or video record with its derived thumbnail.
///
/// Assets are append-only: edits are stored as new assets, never written
/// back into an existing one. The thumbnail is computed exactly once, at
/// creation time, and never updated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// `<upload_timestamp_nanos>-<12 hex chars of SHA-256(original_bytes)>`.
    pub identifier: String,
    /// Display title; the source filename at upload time.
    pub title: String,
    pub media_kind: MediaKind,
    #[serde(with = "base64_bytes")]
    pub original_bytes: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub thumbnail_bytes: Vec<u8>,
    /// Always equals `original_bytes.len()`; enforced at construction.
    pub size_bytes: u64,
    pub upload_timestamp: DateTime<Utc>,
    /// Locked assets are only visible through an unlocked vault session.
    pub locked: bool,
}

impl MediaAsset {
    /// Build a new asset. The identifier is derived from the upload time and
    /// the content hash, and `size_bytes` is fixed to the blob length.
    pub fn new(
        title: impl Into<String>,
        media_kind: MediaKind,
        original_bytes: Vec<u8>,
        thumbnail_bytes: Vec<u8>,
        upload_timestamp: DateTime<Utc>,
    ) -> Self {
        let identifier = derive_id(upload_timestamp, &original_bytes);
        let size_bytes = original_bytes.len() as u64;
        Self {
            identifier,
            title: title.into(),
            media_kind,
            original_bytes,
            thumbnail_bytes,
            size_bytes,
            upload_timestamp,
            locked: false,
        }
    }
}

/// A named, ordered collection of media identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub identifier: String,
    pub name: String,
    pub created_timestamp: DateTime<Utc>,
    pub media_ids: Vec<String>,
    pub hidden: bool,
}

impl Album {
    pub fn new(name: impl Into<String>, created_timestamp: DateTime<Utc>) -> Self {
        let name = name.into();
        let identifier = derive_id(created_timestamp, name.as_bytes());
        Self {
            identifier,
            name,
            created_timestamp,
            media_ids: Vec::new(),
            hidden: false,
        }
    }
}

/// Read-only vault projection returned by the storage service.
///
/// `pin_hash == None` means the vault has never been set up; the client must
/// present the setup flow and never the unlock flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultStatus {
    pub pin_hash: Option<String>,
    pub vault_locked: bool,
    pub pin_attempts: u64,
}

/// Derive a content-qualified identifier: nanosecond timestamp plus the
/// first 12 hex chars of the content hash, so re-uploading identical bytes
/// in the same nanosecond cannot collide with a different file.
pub fn derive_id(timestamp: DateTime<Utc>, content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    let hex: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
    // timestamp_nanos overflows past 2262; the fallback keeps ids well-formed
    let nanos = timestamp.timestamp_nanos_opt().unwrap_or_default();
    format!("{nanos}-{hex}")
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(&encoded).map_err(serde::de::Error::custom)
    }
}
