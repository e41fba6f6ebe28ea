//! Shared fixtures for controller integration tests.

use deepguard_core::MediaFile;
use deepguard_ui::{Effect, Ticket};

/// 2 MB JPEG-typed payload.
#[allow(dead_code)]
pub fn jpeg_2mb() -> MediaFile {
    MediaFile::new("portrait.jpg", "image/jpeg", vec![0x11; 2 * 1024 * 1024])
}

/// 15 MB MP4-typed payload.
#[allow(dead_code)]
pub fn mp4_15mb() -> MediaFile {
    MediaFile::new("clip.mp4", "video/mp4", vec![0x22; 15 * 1024 * 1024])
}

/// Small MP4-typed payload.
#[allow(dead_code)]
pub fn mp4_small() -> MediaFile {
    MediaFile::new("short.mp4", "video/mp4", vec![0x33; 1024])
}

/// Extracts the ticket of a preview read effect.
#[allow(dead_code)]
pub fn preview_ticket(effect: Option<Effect>) -> Ticket {
    match effect {
        Some(Effect::ReadPreview { ticket, .. }) => ticket,
        other => panic!("expected preview read effect, got {other:?}"),
    }
}

/// Extracts the ticket of an analysis effect.
#[allow(dead_code)]
pub fn analysis_ticket(effect: Option<Effect>) -> Ticket {
    match effect {
        Some(Effect::Analyze { ticket, .. }) => ticket,
        other => panic!("expected analysis effect, got {other:?}"),
    }
}
