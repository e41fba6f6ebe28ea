#![warn(missing_docs)]
//! # deepguard-analysis-contract
//!
//! ## Purpose
//! Defines the classification response schema and client-side interpretation
//! helpers.
//!
//! ## Responsibilities
//! - Parse success bodies (`isDeepfake`, `confidence`, optional `message`).
//! - Extract the `detail` message from failure bodies.
//! - Band raw confidence into display verdicts without discarding the raw
//!   result.
//!
//! ## Data flow
//! Raw response body -> [`parse_analysis_response`] -> [`AnalysisResult`] ->
//! [`AnalysisResult::verdict`] -> UI copy via [`Verdict::headline`].
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs to avoid borrowing from transient network
//! buffers.
//!
//! ## Error model
//! Malformed bodies return [`AnalysisContractError`]. Callers surface all of
//! them to the user as [`INVALID_RESPONSE_MESSAGE`].
//!
//! ## Security and privacy notes
//! This crate processes only model verdicts; it never sees media bytes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// User-facing message for any malformed success body.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response format from server";

/// User-facing message when a failure body carries no usable `detail`.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Confidence at or above which the boolean verdict is trusted.
pub const DECISIVE_CONFIDENCE: f64 = 60.0;

/// Confidence at or above which (and below [`DECISIVE_CONFIDENCE`]) the
/// result is treated as uncertain.
pub const UNCERTAIN_CONFIDENCE: f64 = 20.0;

/// Verdict returned by the classification endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Whether the backend classified the media as manipulated.
    pub is_deepfake: bool,
    /// Confidence percentage in [0, 100].
    pub confidence: f64,
    /// Optional human-readable summary from the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalysisResult {
    /// Creates a result without a backend message.
    pub fn new(is_deepfake: bool, confidence: f64) -> Self {
        Self {
            is_deepfake,
            confidence,
            message: None,
        }
    }

    /// Display verdict for this result.
    pub fn verdict(&self) -> Verdict {
        interpret(self.is_deepfake, self.confidence)
    }
}

/// Display category derived from a raw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// High-confidence positive.
    Deepfake,
    /// High-confidence negative.
    Authentic,
    /// Mid-band confidence; content cannot be trusted either way.
    Uncertain,
    /// Low-band confidence; treated as authentic with low assurance.
    LowConfidence,
}

/// UI tone used to color a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Safe to trust.
    Low,
    /// Treat with caution.
    Medium,
    /// Manipulation detected.
    High,
}

impl Verdict {
    /// Result card title.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Deepfake => "Deepfake Detected!",
            Self::Authentic => "Authentic Media",
            Self::Uncertain => "Uncertain Content - Cannot Be Trusted",
            Self::LowConfidence => "Authentic Media (Low Confidence)",
        }
    }

    /// Result card body text.
    pub fn description(self) -> &'static str {
        match self {
            Self::Deepfake => {
                "Clear signs of manipulation were detected in this media. Exercise extreme \
                 caution before sharing or trusting this content."
            }
            Self::Authentic => {
                "This media appears authentic with high confidence. No signs of manipulation \
                 were detected."
            }
            Self::Uncertain => {
                "The analysis is inconclusive. This content cannot be fully trusted and should \
                 be treated with caution until verified through other means."
            }
            Self::LowConfidence => {
                "No meaningful signs of manipulation were detected, but the model reported low \
                 confidence in this result."
            }
        }
    }

    /// Color tone for the result card.
    pub fn risk_level(self) -> RiskLevel {
        match self {
            Self::Deepfake => RiskLevel::High,
            Self::Uncertain => RiskLevel::Medium,
            Self::Authentic | Self::LowConfidence => RiskLevel::Low,
        }
    }
}

/// Maps a raw `(isDeepfake, confidence)` pair to a display verdict.
///
/// Band lower bounds are inclusive: 60 is decisive and 20 is uncertain.
/// The boolean only matters in the decisive band.
pub fn interpret(is_deepfake: bool, confidence: f64) -> Verdict {
    if confidence >= DECISIVE_CONFIDENCE {
        if is_deepfake {
            Verdict::Deepfake
        } else {
            Verdict::Authentic
        }
    } else if confidence >= UNCERTAIN_CONFIDENCE {
        Verdict::Uncertain
    } else {
        Verdict::LowConfidence
    }
}

/// Formats a confidence percentage with two decimals, e.g. `85.00%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.2}%")
}

/// Parses a success body into a validated result.
///
/// `isDeepfake` must be a JSON boolean and `confidence` a JSON number.
/// A non-string `message` is ignored rather than rejected.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for empty or non-JSON bodies.
/// Returns [`AnalysisContractError::InvalidContract`] when the body is not an
/// object or a mandatory field is missing or mistyped.
pub fn parse_analysis_response(raw: &[u8]) -> Result<AnalysisResult, AnalysisContractError> {
    let value: Value = serde_json::from_slice(raw)?;
    let object = value.as_object().ok_or_else(|| {
        AnalysisContractError::InvalidContract("response body is not an object".to_string())
    })?;

    let is_deepfake = object
        .get("isDeepfake")
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            AnalysisContractError::InvalidContract("isDeepfake must be a boolean".to_string())
        })?;

    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            AnalysisContractError::InvalidContract("confidence must be a number".to_string())
        })?;

    let message = object
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(AnalysisResult {
        is_deepfake,
        confidence,
        message,
    })
}

/// Extracts the `detail` string from a failure body, if present.
pub fn parse_error_detail(raw: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(raw).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Failure-body message with the generic fallback applied.
pub fn error_message_from_body(raw: &[u8]) -> String {
    parse_error_detail(raw).unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// Body is not valid JSON.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Body is JSON but violates the response contract.
    #[error("analysis contract violation: {0}")]
    InvalidContract(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for response parsing and banding.

    use super::*;

    #[test]
    fn band_edges_belong_to_higher_band() {
        assert_eq!(interpret(true, 60.0), Verdict::Deepfake);
        assert_eq!(interpret(true, 59.999), Verdict::Uncertain);
        assert_eq!(interpret(false, 20.0), Verdict::Uncertain);
        assert_eq!(interpret(false, 19.999), Verdict::LowConfidence);
    }

    #[test]
    fn boolean_only_matters_in_decisive_band() {
        assert_eq!(interpret(false, 99.0), Verdict::Authentic);
        assert_eq!(interpret(true, 40.0), interpret(false, 40.0));
        assert_eq!(interpret(true, 5.0), Verdict::LowConfidence);
    }

    #[test]
    fn rejects_string_boolean() {
        let error = parse_analysis_response(br#"{"isDeepfake":"yes","confidence":85}"#)
            .expect_err("string boolean should be rejected");
        assert!(matches!(error, AnalysisContractError::InvalidContract(_)));
    }

    #[test]
    fn keeps_backend_message() {
        let parsed = parse_analysis_response(
            br#"{"isDeepfake":false,"confidence":12.5,"message":"Deepfake confidence is 12.50%"}"#,
        )
        .expect("body should parse");
        assert_eq!(parsed.message.as_deref(), Some("Deepfake confidence is 12.50%"));
        assert_eq!(parsed.verdict(), Verdict::LowConfidence);
    }

    #[test]
    fn error_detail_falls_back_when_unusable() {
        assert_eq!(
            error_message_from_body(br#"{"detail":"model unavailable"}"#),
            "model unavailable"
        );
        assert_eq!(error_message_from_body(b"<html>502</html>"), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(
            error_message_from_body(br#"{"detail":[{"msg":"field required"}]}"#),
            UNKNOWN_ERROR_MESSAGE
        );
    }
}
