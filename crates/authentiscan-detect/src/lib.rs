#![warn(missing_docs)]
//! # authentiscan-detect
//!
//! ## Purpose
//! Resolves an [`AnalysisVerdict`] for a selected file through one of two
//! interchangeable strategies.
//!
//! ## Responsibilities
//! - Define the [`VerdictSource`] seam used by the analysis orchestrator.
//! - Provide [`SimulatedSource`], which fabricates a verdict after a delay.
//! - Provide [`RemoteSource`], which posts the file to a detection endpoint.
//! - Classify failures into user-facing categories.
//!
//! ## Data flow
//! Orchestrator builds a [`DetectionRequest`] -> [`VerdictSource::resolve`]
//! -> verdict or [`DetectError`] -> [`classify_detect_error`] on failure.
//!
//! ## Ownership and lifetimes
//! Requests own a copy of the file so the resolve future is `'static` and can
//! be spawned on its own task.
//!
//! ## Error model
//! Every failure is a [`DetectError`]; none are fatal. Callers map them to a
//! [`FailureClass`] and show its [`FailureClass::user_message`].
//!
//! ## Security and privacy notes
//! The bearer credential is wrapped in [`ApiKey`], whose `Debug` output is
//! redacted, and is never logged.

mod remote;
mod simulated;

use std::fmt;

use async_trait::async_trait;
use authentiscan_core::{AnalysisVerdict, MediaFile, MediaType};
use thiserror::Error;

pub use remote::{IDEMPOTENCY_HEADER, RemoteConfig, RemoteSource, validate_endpoint};
pub use simulated::{DEFAULT_SIMULATED_LATENCY_MS, SimulatedSource};

/// One verdict request handed to a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRequest {
    /// Category the file was uploaded as.
    pub media_type: MediaType,
    /// File to analyze.
    pub file: MediaFile,
}

/// Strategy that turns a selected file into a verdict.
#[async_trait]
pub trait VerdictSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Resolves a verdict for one request.
    ///
    /// # Errors
    /// Returns [`DetectError`] for transport, status, and decode failures.
    async fn resolve(&self, request: &DetectionRequest) -> Result<AnalysisVerdict, DetectError>;
}

/// Bearer credential for the detection endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a credential.
    ///
    /// # Errors
    /// Returns [`DetectError::MissingCredential`] for blank keys.
    pub fn new(raw: impl Into<String>) -> Result<Self, DetectError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DetectError::MissingCredential);
        }
        Ok(Self(raw.trim().to_string()))
    }

    /// Returns the raw credential for request signing.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Endpoint unreachable or timed out.
    Connectivity,
    /// Credential rejected (HTTP 401).
    Authentication,
    /// Provider throttled the request (HTTP 429).
    RateLimited,
    /// Anything else, including malformed responses.
    Generic,
}

impl FailureClass {
    /// Notification text shown to the user.
    pub fn user_message(self) -> &'static str {
        match self {
            FailureClass::Connectivity => {
                "Could not reach the detection service. Check your connection and try again."
            }
            FailureClass::Authentication => {
                "Authentication failed. The detection service rejected the API key."
            }
            FailureClass::RateLimited => "Too many requests. Please wait a moment and try again.",
            FailureClass::Generic => "An error occurred during analysis.",
        }
    }
}

/// Classifies a detection failure.
pub fn classify_detect_error(error: &DetectError) -> FailureClass {
    match error {
        DetectError::Connect(_) | DetectError::Timeout => FailureClass::Connectivity,
        DetectError::Unauthorized => FailureClass::Authentication,
        DetectError::RateLimited => FailureClass::RateLimited,
        DetectError::Status(_)
        | DetectError::Malformed(_)
        | DetectError::Request(_)
        | DetectError::InvalidEndpoint(_)
        | DetectError::MissingCredential => FailureClass::Generic,
    }
}

/// Detection failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Connection could not be established.
    #[error("detection endpoint unreachable: {0}")]
    Connect(String),
    /// Request exceeded the configured timeout.
    #[error("detection request timed out")]
    Timeout,
    /// HTTP 401.
    #[error("detection endpoint rejected credentials")]
    Unauthorized,
    /// HTTP 429.
    #[error("detection endpoint rate limited the request")]
    RateLimited,
    /// Any other non-2xx status.
    #[error("detection endpoint returned status {0}")]
    Status(u16),
    /// Body could not be mapped onto a verdict.
    #[error("malformed detection response: {0}")]
    Malformed(String),
    /// Request could not be built or sent.
    #[error("detection request failed: {0}")]
    Request(String),
    /// Endpoint violates transport policy.
    #[error("invalid detection endpoint: {0}")]
    InvalidEndpoint(String),
    /// No credential configured.
    #[error("detection API key is missing")]
    MissingCredential,
}

impl From<authentiscan_contract::ContractError> for DetectError {
    fn from(error: authentiscan_contract::ContractError) -> Self {
        DetectError::Malformed(error.to_string())
    }
}
