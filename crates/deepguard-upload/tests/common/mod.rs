//! Shared fixtures for analysis client integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use deepguard_core::MediaFile;
use deepguard_upload::{AnalysisRequest, AnalysisTransport, TransportResponse, UploadError};
use url::Url;

/// Transport that replays one canned outcome and records requests.
#[derive(Debug)]
pub struct ScriptedTransport {
    outcome: Result<TransportResponse, UploadError>,
    pub requests: Mutex<Vec<AnalysisRequest>>,
}

impl ScriptedTransport {
    /// Replies with `status` and a JSON `body`.
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            outcome: Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with `error`.
    #[allow(dead_code)]
    pub fn failing(error: UploadError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn post_media(
        &self,
        request: &AnalysisRequest,
    ) -> Result<TransportResponse, UploadError> {
        self.requests
            .lock()
            .expect("request log lock should work")
            .push(request.clone());
        self.outcome.clone()
    }

    async fn get(&self, _url: &Url) -> Result<TransportResponse, UploadError> {
        self.outcome.clone()
    }
}

/// Deterministic 2 MB JPEG-typed payload.
#[allow(dead_code)]
pub fn fixture_jpeg() -> MediaFile {
    MediaFile::new("portrait.jpg", "image/jpeg", vec![0xAB; 2 * 1024 * 1024])
}
