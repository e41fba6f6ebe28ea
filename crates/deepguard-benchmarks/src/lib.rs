#![warn(missing_docs)]
//! # deepguard-benchmarks
//!
//! Synthetic media builders for smoke benchmarks of the local pipeline
//! (validation, fingerprinting, preview encoding, verdict banding).

use deepguard_core::MediaFile;

/// Builds a deterministic payload of `size` bytes with the given type.
///
/// Bytes cycle through `0..=250` so base64 output is not a single repeated
/// character.
pub fn synthetic_media(name: &str, mime_type: &str, size: usize) -> MediaFile {
    let bytes: Vec<u8> = (0..size).map(|index| (index % 251) as u8).collect();
    MediaFile::new(name, mime_type, bytes)
}

/// Confidence values spread across every verdict band.
pub fn confidence_sweep() -> impl Iterator<Item = f64> {
    (0..=400).map(|step| f64::from(step) * 0.25)
}
