#![warn(missing_docs)]
//! # deepguard-app
//!
//! ## Purpose
//! Wires the submission controller to real I/O: file loading, preview
//! encoding, and the classification backend.
//!
//! ## Responsibilities
//! - Load configuration from the environment.
//! - Build the production analysis client.
//! - Drive controller effects on the async runtime ([`SubmissionSession`]).
//! - Project controller state into a flat, serializable status view.
//!
//! ## Data flow
//! Path -> [`load_media_file`] -> [`SubmissionSession::pick_file`] ->
//! preview read -> [`SubmissionSession::analyze`] -> backend ->
//! [`project_status`] -> [`render_status`].
//!
//! ## Ownership and lifetimes
//! The session owns the controller; spawned tasks own clones of the media and
//! client and report back over a channel, so controller state is only ever
//! touched from the caller's task.
//!
//! ## Error model
//! Setup failures (config, file I/O, endpoint) are [`AppError`]. Submission
//! failures never surface as errors here; they land in the controller's
//! error state and show up in [`StatusView::error`].
//!
//! ## Security and privacy notes
//! Status views and logs omit payload bytes and data URIs.

mod session;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use deepguard_analysis_contract::{Verdict, format_confidence};
use deepguard_core::MediaFile;
use deepguard_ui::{ErrorKind, ErrorState, PreviewStatus, SubmissionController, UiState};
use deepguard_upload::{AnalysisClient, DEFAULT_BASE_URL, ReqwestTransport, UploadError};
use serde::Serialize;
use thiserror::Error;

pub use session::SubmissionSession;

/// Build-time application version loaded from root `VERSION`.
pub const APP_VERSION: &str = env!("DEEPGUARD_VERSION");

/// Environment variable overriding the backend base address.
pub const ENDPOINT_ENV: &str = "DEEPGUARD_ENDPOINT";

/// Environment variable setting the request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "DEEPGUARD_TIMEOUT_SECS";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base address; `/analyze` and `/health` are appended.
    pub endpoint: String,
    /// Overall request timeout; `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    /// Reads [`ENDPOINT_ENV`] and [`TIMEOUT_ENV`] over the defaults.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when the timeout is not a whole number.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(endpoint) = non_blank_env(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Some(raw) = non_blank_env(TIMEOUT_ENV) {
            config.request_timeout = parse_timeout_secs(&raw)?;
        }

        Ok(config)
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses a timeout in seconds; `0` disables the timeout.
///
/// # Errors
/// Returns [`AppError::Config`] for anything that is not a whole number.
pub fn parse_timeout_secs(raw: &str) -> Result<Option<Duration>, AppError> {
    let seconds: u64 = raw.trim().parse().map_err(|_| {
        AppError::Config(format!("{TIMEOUT_ENV} must be whole seconds, got '{raw}'"))
    })?;
    Ok(timeout_from_secs(seconds))
}

/// Maps whole seconds to a timeout, treating `0` as none.
pub fn timeout_from_secs(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

/// Builds the production reqwest-backed client.
///
/// # Errors
/// Returns [`AppError::Upload`] for an unusable endpoint or HTTP client.
pub fn build_client(config: &AppConfig) -> Result<AnalysisClient, AppError> {
    let transport = ReqwestTransport::new(config.request_timeout)?;
    Ok(AnalysisClient::new(&config.endpoint, Arc::new(transport))?)
}

/// Reads a file from disk, declaring its type from the extension.
///
/// Unknown extensions are declared `application/octet-stream` and left for
/// the validator to reject.
///
/// # Errors
/// Returns [`AppError::Io`] when the file cannot be read.
pub async fn load_media_file(path: &Path) -> Result<MediaFile, AppError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(MediaFile::new(name, mime_type, bytes))
}

/// Converts a client failure into the controller's error state.
pub fn error_state_from_upload(error: UploadError) -> ErrorState {
    let kind = match error {
        UploadError::Network(_) => ErrorKind::Network,
        UploadError::Protocol(_) | UploadError::InvalidEndpoint(_) => ErrorKind::Protocol,
    };
    ErrorState::new(kind, error.to_string())
}

/// Flat snapshot of controller state for rendering or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    /// Derived phase name.
    pub state: String,
    /// Staged file name.
    pub file_name: Option<String>,
    /// Staged MIME type.
    pub mime_type: Option<String>,
    /// Staged size in bytes.
    pub size_bytes: Option<u64>,
    /// `loading`, `embedded`, `transient`, or `unavailable`.
    pub preview: Option<String>,
    /// Display verdict.
    pub verdict: Option<Verdict>,
    /// Verdict headline.
    pub headline: Option<String>,
    /// Verdict description.
    pub description: Option<String>,
    /// Raw boolean from the backend.
    pub is_deepfake: Option<bool>,
    /// Raw confidence percentage.
    pub confidence: Option<f64>,
    /// Confidence formatted for display.
    pub confidence_text: Option<String>,
    /// Backend summary, when provided.
    pub message: Option<String>,
    /// Error message, when errored.
    pub error: Option<String>,
}

/// Projects controller state into a [`StatusView`].
pub fn project_status(controller: &SubmissionController) -> StatusView {
    let staged = controller.staged();
    let result = controller.result();
    let verdict = controller.verdict();

    StatusView {
        state: format!("{:?}", controller.state()),
        file_name: staged.map(|staged| staged.media().name().to_string()),
        mime_type: staged.map(|staged| staged.media().mime_type().to_string()),
        size_bytes: staged.map(|staged| staged.media().size()),
        preview: staged.map(|staged| preview_label(staged.preview()).to_string()),
        verdict,
        headline: verdict.map(|verdict| verdict.headline().to_string()),
        description: verdict.map(|verdict| verdict.description().to_string()),
        is_deepfake: result.map(|result| result.is_deepfake),
        confidence: result.map(|result| result.confidence),
        confidence_text: result.map(|result| format_confidence(result.confidence)),
        message: result.and_then(|result| result.message.clone()),
        error: controller.error().map(|error| error.message.clone()),
    }
}

fn preview_label(preview: &PreviewStatus) -> &'static str {
    match preview {
        PreviewStatus::Loading => "loading",
        PreviewStatus::Ready(handle) if handle.is_transient() => "transient",
        PreviewStatus::Ready(_) => "embedded",
        PreviewStatus::Unavailable => "unavailable",
    }
}

/// Renders a status view as plain text lines.
///
/// An error line comes first; a result from an earlier cycle is still shown
/// beneath it.
pub fn render_status(view: &StatusView) -> String {
    let mut lines = Vec::new();

    if let Some(file_name) = &view.file_name {
        let mime_type = view.mime_type.as_deref().unwrap_or("unknown");
        let size = view.size_bytes.unwrap_or_default();
        lines.push(format!("File: {file_name} ({mime_type}, {size} bytes)"));
    }

    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}"));
    }

    if let (Some(headline), Some(confidence)) = (&view.headline, &view.confidence_text) {
        lines.push(headline.clone());
        lines.push(format!("Confidence: {confidence}"));
        if let Some(description) = &view.description {
            lines.push(description.clone());
        }
        if let Some(message) = &view.message {
            lines.push(format!("Server: {message}"));
        }
    } else if view.error.is_none() {
        if view.state == format!("{:?}", UiState::Empty) {
            lines.push("No file selected".to_string());
        } else {
            lines.push(format!("Status: {}", view.state));
        }
    }

    lines.join("\n")
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration value could not be used.
    #[error("configuration error: {0}")]
    Config(String),
    /// Input file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Client construction failed.
    #[error("analysis client error: {0}")]
    Upload(#[from] UploadError),
}
