#![warn(missing_docs)]
//! # deepguard-preview
//!
//! ## Purpose
//! Builds locally renderable previews for staged media.
//!
//! ## Responsibilities
//! - Encode images into self-contained `data:` URIs on a blocking worker.
//! - Mint transient `blob:` URIs for video backed by an in-process registry.
//! - Release transient URIs when their handle is dropped.
//!
//! ## Data flow
//! Staged [`MediaFile`] -> [`begin_preview`] -> either a ready
//! [`PreviewHandle::Transient`] (video) or [`PreviewPlan::Deferred`] (image),
//! which the caller resolves with [`read_data_uri`].
//!
//! ## Ownership and lifetimes
//! An [`ObjectUrl`] exclusively owns its registry entry and revokes it in
//! `Drop`, so replacing or clearing a preview cannot leak the entry. Handles
//! hold a `Weak` registry reference and never keep the registry alive.
//!
//! ## Error model
//! Only the deferred image read can fail; it returns [`PreviewError`].
//!
//! ## Security and privacy notes
//! Transient URIs use random identifiers and resolve only inside this process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use deepguard_core::{MediaFile, MediaKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Scheme and authority prefix for transient preview URIs.
pub const OBJECT_URL_PREFIX: &str = "blob:deepguard/";

/// Renderable reference to the staged media.
#[derive(Debug)]
pub enum PreviewHandle {
    /// Self-contained `data:` URI; nothing to release.
    Embedded(String),
    /// Session-scoped `blob:` URI; released on drop.
    Transient(ObjectUrl),
}

impl PreviewHandle {
    /// URI to hand to a renderer.
    pub fn uri(&self) -> &str {
        match self {
            Self::Embedded(uri) => uri,
            Self::Transient(object_url) => object_url.as_str(),
        }
    }

    /// Returns `true` for registry-backed handles.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Outcome of starting a preview.
#[derive(Debug)]
pub enum PreviewPlan {
    /// Preview is usable immediately.
    Ready(PreviewHandle),
    /// Preview needs [`read_data_uri`] to finish first.
    Deferred,
}

/// Starts preview generation for validated media.
///
/// Video gets a transient URI synchronously; images are deferred to the
/// asynchronous read.
pub fn begin_preview(
    media: &MediaFile,
    kind: MediaKind,
    registry: &Arc<ObjectUrlRegistry>,
) -> PreviewPlan {
    match kind {
        MediaKind::Video => PreviewPlan::Ready(PreviewHandle::Transient(
            registry.create_object_url(media),
        )),
        MediaKind::Image => PreviewPlan::Deferred,
    }
}

/// Encodes media as a `data:<mime>;base64,<payload>` URI.
pub fn encode_data_uri(media: &MediaFile) -> String {
    let encoded = STANDARD.encode(media.bytes());
    format!("data:{};base64,{encoded}", media.mime_type())
}

/// Reads the full payload into a data URI on the blocking pool.
///
/// # Errors
/// Returns [`PreviewError::ReadFailed`] when the worker task does not
/// complete.
pub async fn read_data_uri(media: MediaFile) -> Result<String, PreviewError> {
    tokio::task::spawn_blocking(move || encode_data_uri(&media))
        .await
        .map_err(|error| PreviewError::ReadFailed(error.to_string()))
}

/// In-process store backing transient preview URIs.
#[derive(Debug)]
pub struct ObjectUrlRegistry {
    state: Mutex<RegistryState>,
}

#[derive(Debug)]
struct RegistryState {
    rng: StdRng,
    entries: HashMap<String, Arc<[u8]>>,
}

impl ObjectUrlRegistry {
    /// Creates an empty shared registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RegistryState {
                rng: StdRng::from_os_rng(),
                entries: HashMap::new(),
            }),
        })
    }

    /// Registers the payload under a fresh random URI.
    pub fn create_object_url(self: &Arc<Self>, media: &MediaFile) -> ObjectUrl {
        let mut state = self.lock();
        let url = loop {
            let candidate = format!("{OBJECT_URL_PREFIX}{:032x}", state.rng.random::<u128>());
            if !state.entries.contains_key(&candidate) {
                break candidate;
            }
        };
        state.entries.insert(url.clone(), media.shared_bytes());

        ObjectUrl {
            url,
            registry: Arc::downgrade(self),
        }
    }

    /// Returns the payload behind a live URI.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.lock().entries.get(url).cloned()
    }

    /// Number of URIs not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().entries.len()
    }

    fn revoke(&self, url: &str) {
        self.lock().entries.remove(url);
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owned transient URI; revoked from its registry on drop.
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
    registry: Weak<ObjectUrlRegistry>,
}

impl ObjectUrl {
    /// The `blob:` URI string.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.revoke(&self.url);
        }
    }
}

/// Preview generation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// The asynchronous read did not produce a result.
    #[error("Failed to read file for preview: {0}")]
    ReadFailed(String),
}
