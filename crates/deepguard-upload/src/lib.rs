#![warn(missing_docs)]
//! # deepguard-upload
//!
//! ## Purpose
//! Submits staged media to the classification backend and interprets the
//! HTTP response.
//!
//! ## Responsibilities
//! - Resolve and validate the `/analyze` and `/health` endpoints.
//! - Send one multipart `POST` per submission with the payload under `file`.
//! - Classify failures into network and protocol errors with user-facing
//!   messages.
//!
//! ## Data flow
//! Staged [`MediaFile`] -> [`AnalysisRequest`] -> [`AnalysisTransport`] ->
//! [`TransportResponse`] -> [`interpret_response`] -> [`AnalysisResult`].
//!
//! ## Ownership and lifetimes
//! Requests share the staged payload through `Arc<[u8]>`; the transport copies
//! it only when building the multipart body.
//!
//! ## Error model
//! [`UploadError::Network`] covers transport failures and
//! [`UploadError::Protocol`] covers non-success statuses and malformed bodies.
//! Both display their message verbatim. Nothing is retried automatically.
//!
//! ## Security and privacy notes
//! Logs carry the payload fingerprint and size, never the payload itself.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deepguard_analysis_contract::{
    AnalysisResult, INVALID_RESPONSE_MESSAGE, error_message_from_body, parse_analysis_response,
};
use deepguard_core::MediaFile;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Base address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Classification route appended to the base address.
pub const ANALYZE_PATH: &str = "/analyze";

/// Liveness route appended to the base address.
pub const HEALTH_PATH: &str = "/health";

/// Multipart field carrying the media bytes.
pub const FILE_FIELD_NAME: &str = "file";

/// One multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Fully resolved `/analyze` URL.
    pub endpoint: Url,
    /// Multipart filename.
    pub file_name: String,
    /// Part content type.
    pub mime_type: String,
    /// Raw payload.
    pub bytes: Arc<[u8]>,
}

impl AnalysisRequest {
    /// Builds a request for staged media.
    pub fn for_media(endpoint: Url, media: &MediaFile) -> Self {
        Self {
            endpoint,
            file_name: media.name().to_string(),
            mime_type: media.mime_type().to_string(),
            bytes: media.shared_bytes(),
        }
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract HTTP transport used by [`AnalysisClient`].
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Sends the multipart `POST` for one submission.
    async fn post_media(&self, request: &AnalysisRequest)
    -> Result<TransportResponse, UploadError>;

    /// Sends a plain `GET`.
    async fn get(&self, url: &Url) -> Result<TransportResponse, UploadError>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with an optional overall request timeout.
    ///
    /// # Errors
    /// Returns [`UploadError::Network`] when the HTTP client cannot be
    /// initialized (for example, no TLS backend is available).
    pub fn new(timeout: Option<Duration>) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|error| {
            UploadError::Network(format!("failed to build HTTP client: {error}"))
        })?;
        Ok(Self { client })
    }

    /// Wraps a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisTransport for ReqwestTransport {
    async fn post_media(
        &self,
        request: &AnalysisRequest,
    ) -> Result<TransportResponse, UploadError> {
        let part = Part::bytes(request.bytes.to_vec()).file_name(request.file_name.clone());
        let part = match part.mime_str(&request.mime_type) {
            Ok(part) => part,
            Err(error) => {
                warn!(
                    mime_type = %request.mime_type,
                    %error,
                    "unparseable content type; sending part untyped"
                );
                Part::bytes(request.bytes.to_vec()).file_name(request.file_name.clone())
            }
        };
        let form = Form::new().part(FILE_FIELD_NAME, part);

        let response = self
            .client
            .post(request.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;
        read_response(response).await
    }

    async fn get(&self, url: &Url) -> Result<TransportResponse, UploadError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network_error)?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<TransportResponse, UploadError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(network_error)?;
    Ok(TransportResponse {
        status,
        body: body.to_vec(),
    })
}

fn network_error(error: reqwest::Error) -> UploadError {
    UploadError::Network(format!("Network error: {error}"))
}

/// Client for the classification backend.
#[derive(Clone)]
pub struct AnalysisClient {
    analyze_url: Url,
    health_url: Url,
    transport: Arc<dyn AnalysisTransport>,
}

impl AnalysisClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    /// Returns [`UploadError::InvalidEndpoint`] when `base_url` is not an
    /// absolute `http`/`https` URL.
    pub fn new(
        base_url: &str,
        transport: Arc<dyn AnalysisTransport>,
    ) -> Result<Self, UploadError> {
        let analyze_url = resolve_endpoint(base_url, ANALYZE_PATH)?;
        let health_url = resolve_endpoint(base_url, HEALTH_PATH)?;
        if analyze_url.scheme() != "https" {
            warn!(endpoint = %analyze_url, "analysis endpoint is not using https");
        }

        Ok(Self {
            analyze_url,
            health_url,
            transport,
        })
    }

    /// Resolved `/analyze` URL.
    pub fn analyze_url(&self) -> &Url {
        &self.analyze_url
    }

    /// Submits staged media once and interprets the response.
    ///
    /// # Errors
    /// Returns [`UploadError::Network`] when the transport fails and
    /// [`UploadError::Protocol`] for non-success statuses or malformed bodies.
    pub async fn analyze(&self, media: &MediaFile) -> Result<AnalysisResult, UploadError> {
        let request = AnalysisRequest::for_media(self.analyze_url.clone(), media);
        info!(
            endpoint = %request.endpoint,
            fingerprint = %media.fingerprint(),
            size = media.size(),
            mime_type = %request.mime_type,
            "submitting media for analysis"
        );

        let response = self.transport.post_media(&request).await?;
        debug!(
            status = response.status,
            body_len = response.body.len(),
            "analysis response received"
        );

        let result = interpret_response(&response);
        match &result {
            Ok(parsed) => info!(
                is_deepfake = parsed.is_deepfake,
                confidence = parsed.confidence,
                "analysis completed"
            ),
            Err(error) => warn!(status = response.status, %error, "analysis rejected"),
        }
        result
    }

    /// Probes the backend liveness route and returns its reported status.
    ///
    /// # Errors
    /// Returns [`UploadError::Network`] when the transport fails and
    /// [`UploadError::Protocol`] for non-success statuses or bodies without a
    /// `status` string.
    pub async fn health(&self) -> Result<String, UploadError> {
        let response = self.transport.get(&self.health_url).await?;
        if !response.is_success() {
            return Err(UploadError::Protocol(error_message_from_body(&response.body)));
        }

        serde_json::from_slice::<HealthResponse>(&response.body)
            .map(|health| health.status)
            .map_err(|_| UploadError::Protocol(INVALID_RESPONSE_MESSAGE.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Maps a raw HTTP exchange to a result or a protocol error.
///
/// # Errors
/// Non-success statuses yield the body's `detail` (or a generic fallback);
/// malformed success bodies yield [`INVALID_RESPONSE_MESSAGE`].
pub fn interpret_response(response: &TransportResponse) -> Result<AnalysisResult, UploadError> {
    if !response.is_success() {
        return Err(UploadError::Protocol(error_message_from_body(&response.body)));
    }

    parse_analysis_response(&response.body).map_err(|error| {
        debug!(%error, "success body failed contract checks");
        UploadError::Protocol(INVALID_RESPONSE_MESSAGE.to_string())
    })
}

/// Joins `path` onto an `http`/`https` base address.
///
/// Any path already on the base is kept, so `http://host/api` resolves to
/// `http://host/api/analyze`.
///
/// # Errors
/// Returns [`UploadError::InvalidEndpoint`] for unparseable URLs or other
/// schemes.
pub fn resolve_endpoint(base_url: &str, path: &str) -> Result<Url, UploadError> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|error| UploadError::InvalidEndpoint(format!("invalid base url: {error}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UploadError::InvalidEndpoint(format!(
            "unsupported scheme '{}'; expected http or https",
            url.scheme()
        )));
    }

    let joined = format!("{}{path}", url.path().trim_end_matches('/'));
    url.set_path(&joined);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Analysis client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Configured base address is unusable.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("{0}")]
    Network(String),
    /// Backend reachable but returned an error or malformed body.
    #[error("{0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for endpoint policy and response interpretation.

    use super::*;

    #[test]
    fn resolves_analyze_route() {
        let url = resolve_endpoint(DEFAULT_BASE_URL, ANALYZE_PATH).expect("default should resolve");
        assert_eq!(url.as_str(), "http://localhost:8000/analyze");

        let nested = resolve_endpoint("https://api.example.test/v1/", ANALYZE_PATH)
            .expect("nested base should resolve");
        assert_eq!(nested.as_str(), "https://api.example.test/v1/analyze");
    }

    #[test]
    fn rejects_non_http_endpoints() {
        assert!(resolve_endpoint("ftp://example.test", ANALYZE_PATH).is_err());
        assert!(resolve_endpoint("localhost:8000", ANALYZE_PATH).is_err());
        assert!(resolve_endpoint("", ANALYZE_PATH).is_err());
    }

    #[test]
    fn server_error_uses_detail() {
        let response = TransportResponse {
            status: 500,
            body: br#"{"detail":"model unavailable"}"#.to_vec(),
        };
        assert_eq!(
            interpret_response(&response),
            Err(UploadError::Protocol("model unavailable".to_string()))
        );
    }
}
