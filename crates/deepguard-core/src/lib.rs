#![warn(missing_docs)]
//! # deepguard-core
//!
//! ## Purpose
//! Defines the media data model shared across the `deepguard` workspace.
//!
//! ## Responsibilities
//! - Represent a user-selected media payload with declared type and size.
//! - Classify declared MIME types into supported media kinds.
//! - Enforce the client-side acceptance rules (type prefix, 10 MiB limit).
//! - Derive a stable content fingerprint for log correlation.
//!
//! ## Data flow
//! Acquisition code wraps raw bytes in a [`MediaFile`] candidate.
//! [`validate_media`] either accepts it (yielding its [`MediaKind`]) or rejects
//! it with a [`CoreError`] whose message is shown to the user verbatim.
//!
//! ## Ownership and lifetimes
//! Payload bytes live behind an `Arc<[u8]>`, so the staged file, its preview,
//! and an in-flight upload can share one buffer without copying.
//!
//! ## Error model
//! Validation failures return [`CoreError`] variants whose `Display` output is
//! the exact user-facing message.
//!
//! ## Security and privacy notes
//! This crate never logs payload bytes. Fingerprints are one-way digests.
//!
//! ## Example
//! ```rust
//! use deepguard_core::{MediaFile, MediaKind, validate_media};
//!
//! let file = MediaFile::new("face.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]);
//! assert_eq!(validate_media(&file).unwrap(), MediaKind::Image);
//! ```

use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Largest accepted payload in bytes (10 MiB).
pub const MAX_MEDIA_BYTES: u64 = 10 * 1024 * 1024;

/// MIME prefix for still images.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// MIME prefix for video.
pub const VIDEO_MIME_PREFIX: &str = "video/";

/// Supported media families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Still image; previewed as an embedded data URI.
    Image,
    /// Video; previewed through a transient object URL.
    Video,
}

impl MediaKind {
    /// Classifies a declared MIME type by prefix.
    ///
    /// Returns `None` for anything that is neither `image/*` nor `video/*`.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with(IMAGE_MIME_PREFIX) {
            Some(Self::Image)
        } else if mime_type.starts_with(VIDEO_MIME_PREFIX) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Returns `true` when the declared type is an image or video type.
pub fn is_supported_mime(mime_type: &str) -> bool {
    MediaKind::from_mime(mime_type).is_some()
}

/// User-selected media payload.
///
/// Immutable once constructed; a new acquisition replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl MediaFile {
    /// Wraps raw bytes with the name and MIME type declared by the source.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Original file name, used as the multipart filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Borrowed payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the payload buffer.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Media family derived from the declared type.
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime_type)
    }

    /// Lowercase hex SHA-256 of the payload.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// Applies the acceptance rules to a candidate file.
///
/// The type check runs first so an oversized text file reports the type
/// problem rather than the size.
///
/// # Errors
/// Returns [`CoreError::UnsupportedType`] when the declared type is not an
/// image or video type.
/// Returns [`CoreError::FileTooLarge`] when the payload exceeds
/// [`MAX_MEDIA_BYTES`].
pub fn validate_media(candidate: &MediaFile) -> Result<MediaKind, CoreError> {
    let kind = candidate
        .kind()
        .ok_or_else(|| CoreError::UnsupportedType(candidate.mime_type().to_string()))?;

    if candidate.size() > MAX_MEDIA_BYTES {
        return Err(CoreError::FileTooLarge {
            size: candidate.size(),
            limit: MAX_MEDIA_BYTES,
        });
    }

    Ok(kind)
}

/// Error type for media validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Declared type is neither `image/*` nor `video/*`.
    #[error("Only image and video files are supported")]
    UnsupportedType(String),
    /// Payload exceeds the upload limit.
    #[error("File size must be less than 10MB")]
    FileTooLarge {
        /// Actual payload size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
}
