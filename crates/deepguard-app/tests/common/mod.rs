//! Shared fixtures for app integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use deepguard_core::MediaFile;
use deepguard_upload::{
    AnalysisClient, AnalysisRequest, AnalysisTransport, TransportResponse, UploadError,
};
use tokio::sync::Semaphore;
use url::Url;

/// Transport replying with one canned outcome, optionally held behind a gate.
pub struct FakeBackend {
    outcome: Result<TransportResponse, UploadError>,
    gate: Option<Semaphore>,
    calls: AtomicUsize,
}

impl FakeBackend {
    /// Replies immediately with `status` and `body`.
    #[allow(dead_code)]
    pub fn replying(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Replies with `status` and `body` only after [`FakeBackend::release`].
    #[allow(dead_code)]
    pub fn gated(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            gate: Some(Semaphore::new(0)),
            calls: AtomicUsize::new(0),
        })
    }

    /// Fails every call with `error`.
    #[allow(dead_code)]
    pub fn failing(error: UploadError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Lets one gated call complete.
    #[allow(dead_code)]
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Number of `POST`s received.
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisTransport for FakeBackend {
    async fn post_media(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<TransportResponse, UploadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate should stay open")
                .forget();
        }
        self.outcome.clone()
    }

    async fn get(&self, _url: &Url) -> Result<TransportResponse, UploadError> {
        self.outcome.clone()
    }
}

/// Client pointed at the default base address using `backend`.
pub fn client_for(backend: &Arc<FakeBackend>) -> AnalysisClient {
    let transport: Arc<dyn AnalysisTransport> = backend.clone();
    AnalysisClient::new("http://localhost:8000", transport).expect("client should build")
}

/// 2 MB JPEG-typed payload.
#[allow(dead_code)]
pub fn jpeg_2mb() -> MediaFile {
    MediaFile::new("portrait.jpg", "image/jpeg", vec![0x5A; 2 * 1024 * 1024])
}

/// 15 MB MP4-typed payload.
#[allow(dead_code)]
pub fn mp4_15mb() -> MediaFile {
    MediaFile::new("clip.mp4", "video/mp4", vec![0x00; 15 * 1024 * 1024])
}
