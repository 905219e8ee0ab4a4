#![warn(missing_docs)]
//! # authentiscan-app
//!
//! ## Purpose
//! Orchestrates file selection, analysis, and result rendering for
//! `authentiscan`.
//!
//! ## Responsibilities
//! - Own the page state through [`UploadAnalysisController`].
//! - Run the progress ticker and verdict fetch as independent tasks and join
//!   them at the result transition.
//! - Map detection failures onto user-facing notifications.
//! - Load runtime configuration and expose the build version.
//!
//! ## Data flow
//! Picker/drop -> [`UploadAnalysisController::select_file`] -> preview patch ->
//! [`UploadAnalysisController::start_analysis`] -> ticker + verdict tasks ->
//! [`UploadAnalysisController::handle_event`] -> result or error toast.
//!
//! ## Ownership and lifetimes
//! The controller exclusively owns [`authentiscan_ui::UiState`] and its
//! [`DomSurface`]; background tasks only hold channel senders and owned
//! request copies.
//!
//! ## Error model
//! Every user-visible failure is an [`AnalysisError`]; none are fatal and all
//! leave the controller interactive. Bootstrap failures are [`AppError`].
//!
//! ## Security and privacy notes
//! The detection credential is never logged; [`redact_sensitive`] strips
//! credential markers from free-form log text.

mod config;
mod controller;
mod surface;

use authentiscan_core::MediaType;
use authentiscan_detect::{DetectError, FailureClass, classify_detect_error};
use thiserror::Error;

pub use config::{
    AppConfig, ConfigError, ENV_API_KEY, ENV_API_URL, ENV_PROGRESS_INTERVAL_MS,
    ENV_SIMULATED_LATENCY_MS, ENV_STRATEGY, ENV_THRESHOLD, ENV_TIMEOUT_SECS, Strategy,
};
pub use controller::{
    AnalysisOutcome, ControllerEvent, DropOutcome, EventDisposition, RunId,
    UploadAnalysisController,
};
pub use surface::{DomSurface, HeadlessSurface};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("AUTHENTISCAN_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Redacts common secret markers in log-safe output.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for key in ["authorization", "bearer", "api_key", "token", "password"] {
        redacted = redact_from_key(&redacted, key);
    }
    redacted
}

fn redact_from_key(input: &str, key: &str) -> String {
    match input.to_ascii_lowercase().find(key) {
        Some(position) => format!("{}{key}=<redacted>", &input[..position]),
        None => input.to_string(),
    }
}

/// User-visible analysis failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Analysis triggered before a file was selected.
    #[error("no {0} file selected")]
    NoFileSelected(MediaType),
    /// Detection service unreachable.
    #[error("detection service unreachable")]
    NetworkUnreachable,
    /// Detection service rejected the credential.
    #[error("detection service authentication failed")]
    AuthFailure,
    /// Detection service throttled the request.
    #[error("detection service rate limited the request")]
    RateLimited,
    /// Any other detection failure.
    #[error("detection failed: {0}")]
    GenericApiFailure(String),
    /// Detection response could not be mapped.
    #[error("malformed detection response: {0}")]
    MalformedResponse(String),
    /// Premium tab used while logged out.
    #[error("{0} analysis requires login")]
    PremiumLocked(MediaType),
    /// File MIME type does not match the tab.
    #[error("{mime_type} is not a supported {media_type} file")]
    UnsupportedFile {
        /// Target tab.
        media_type: MediaType,
        /// Rejected MIME type.
        mime_type: String,
    },
    /// Selection targeted a tab that is not shown.
    #[error("{0} is not the active media type")]
    InactiveMediaType(MediaType),
    /// A run is already pending.
    #[error("analysis already in progress")]
    AnalysisInProgress,
    /// Run was abandoned before it settled.
    #[error("analysis cancelled")]
    Cancelled,
    /// Preview generation task failed.
    #[error("preview generation failed: {0}")]
    PreviewFailed(String),
}

impl AnalysisError {
    /// Notification text for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::NoFileSelected(media_type) => {
                format!("Please upload {} first!", with_article(*media_type))
            }
            AnalysisError::NetworkUnreachable => {
                FailureClass::Connectivity.user_message().to_string()
            }
            AnalysisError::AuthFailure => FailureClass::Authentication.user_message().to_string(),
            AnalysisError::RateLimited => FailureClass::RateLimited.user_message().to_string(),
            AnalysisError::GenericApiFailure(_)
            | AnalysisError::MalformedResponse(_)
            | AnalysisError::Cancelled
            | AnalysisError::PreviewFailed(_) => FailureClass::Generic.user_message().to_string(),
            AnalysisError::PremiumLocked(media_type) => format!(
                "{} analysis is a premium feature. Please log in to unlock it.",
                media_type.label()
            ),
            AnalysisError::UnsupportedFile { media_type, .. } => {
                format!("Unsupported file type. Please choose {} file.", with_article(*media_type))
            }
            AnalysisError::InactiveMediaType(media_type) => {
                format!("Switch to the {} tab to upload this file.", media_type.label())
            }
            AnalysisError::AnalysisInProgress => {
                "Analysis in progress. Please wait for the result.".to_string()
            }
        }
    }
}

impl From<DetectError> for AnalysisError {
    fn from(error: DetectError) -> Self {
        if let DetectError::Malformed(detail) = &error {
            return AnalysisError::MalformedResponse(detail.clone());
        }
        match classify_detect_error(&error) {
            FailureClass::Connectivity => AnalysisError::NetworkUnreachable,
            FailureClass::Authentication => AnalysisError::AuthFailure,
            FailureClass::RateLimited => AnalysisError::RateLimited,
            FailureClass::Generic => AnalysisError::GenericApiFailure(error.to_string()),
        }
    }
}

fn with_article(media_type: MediaType) -> String {
    let noun = media_type.as_str();
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {noun}"),
        _ => format!("a {noun}"),
    }
}

/// Bootstrap error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
