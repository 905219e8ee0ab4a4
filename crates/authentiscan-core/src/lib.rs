#![warn(missing_docs)]
//! # authentiscan-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `authentiscan` workspace.
//!
//! ## Responsibilities
//! - Represent media categories, including premium (login-gated) ones.
//! - Represent a user-selected file and its renderable preview handle.
//! - Represent one analysis verdict with its four explanatory factors.
//! - Normalize and clamp confidence values for display.
//!
//! ## Data flow
//! The upload manager wraps raw bytes into [`MediaFile`] and hands it to
//! [`MediaSelection::prepare`], which fingerprints it once and derives the
//! [`PreviewHandle`]. A verdict source later produces an [`AnalysisVerdict`]
//! which the result renderer consumes.
//!
//! ## Ownership and lifetimes
//! Files own their byte buffers (`Vec<u8>`) so a selection can be handed to an
//! asynchronous verdict task without borrowing from UI state.
//!
//! ## Error model
//! Construction-time validation failures return [`CoreError`].
//!
//! ## Example
//! ```rust
//! use authentiscan_core::{display_percent, normalize_confidence, MediaType};
//!
//! assert!(MediaType::Image.accepts_mime("image/png"));
//! assert_eq!(display_percent(normalize_confidence(0.914)), 91);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Object-URL scheme prefix used for streamed (non-inlined) previews.
pub const OBJECT_URL_PREFIX: &str = "blob:authentiscan/";

/// Media category the user analyzes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image upload.
    Image,
    /// Video upload.
    Video,
    /// Audio upload (premium).
    Audio,
    /// Link check (premium).
    Link,
    /// News article check (premium).
    News,
}

impl MediaType {
    /// Every media type in tab order.
    pub const ALL: [MediaType; 5] = [
        MediaType::Image,
        MediaType::Video,
        MediaType::Audio,
        MediaType::Link,
        MediaType::News,
    ];

    /// Wire name sent as the `type` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Link => "link",
            MediaType::News => "news",
        }
    }

    /// Capitalized label used in headlines ("Image", "Video", ...).
    pub fn label(self) -> &'static str {
        match self {
            MediaType::Image => "Image",
            MediaType::Video => "Video",
            MediaType::Audio => "Audio",
            MediaType::Link => "Link",
            MediaType::News => "News",
        }
    }

    /// Returns `true` for categories gated behind login.
    pub fn is_premium(self) -> bool {
        matches!(self, MediaType::Audio | MediaType::Link | MediaType::News)
    }

    /// MIME prefix accepted by this category's file input.
    ///
    /// Link and news checks have no file input and return `None`.
    pub fn accepted_mime_prefix(self) -> Option<&'static str> {
        match self {
            MediaType::Image => Some("image/"),
            MediaType::Video => Some("video/"),
            MediaType::Audio => Some("audio/"),
            MediaType::Link | MediaType::News => None,
        }
    }

    /// Returns `true` when `mime` is accepted by this category.
    pub fn accepts_mime(self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        self.accepted_mime_prefix()
            .is_some_and(|prefix| mime.starts_with(prefix) && mime.len() > prefix.len())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file chosen through the picker or dropped onto an upload region.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Original file name.
    pub name: String,
    /// Browser-reported MIME type.
    pub mime_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl MediaFile {
    /// Constructs a validated file handle.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyFileName`] when `name` is blank.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::EmptyFileName);
        }

        Ok(Self {
            name,
            mime_type: mime_type.into(),
            bytes,
        })
    }

    /// File size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Stable SHA-256 fingerprint of media type and file contents.
    ///
    /// Identical uploads of the same category always yield the same key.
    pub fn fingerprint(&self, media_type: MediaType) -> String {
        let mut hasher = Sha256::new();
        hasher.update(media_type.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}

// Bytes are omitted from debug output.
impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Renderable reference to a preview of a selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewHandle {
    /// Inline `data:` URL with base64 payload (images).
    DataUrl(String),
    /// Streamed object URL (video and audio).
    ObjectUrl(String),
}

impl PreviewHandle {
    /// Returns the value suitable for a `src` attribute.
    pub fn src(&self) -> &str {
        match self {
            PreviewHandle::DataUrl(url) | PreviewHandle::ObjectUrl(url) => url,
        }
    }
}

/// Builds a preview handle for a selected file.
///
/// Images are inlined as data URLs; larger media is referenced through an
/// object URL keyed by the file fingerprint.
pub fn build_preview(media_type: MediaType, file: &MediaFile) -> PreviewHandle {
    match media_type {
        MediaType::Image => preview_with(media_type, file, ""),
        _ => preview_with(media_type, file, &file.fingerprint(media_type)),
    }
}

fn preview_with(media_type: MediaType, file: &MediaFile, fingerprint: &str) -> PreviewHandle {
    match media_type {
        MediaType::Image => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
            PreviewHandle::DataUrl(format!("data:{};base64,{encoded}", file.mime_type))
        }
        _ => PreviewHandle::ObjectUrl(format!(
            "{OBJECT_URL_PREFIX}{}",
            fingerprint.get(..16).unwrap_or(fingerprint)
        )),
    }
}

/// Current selection for one media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSelection {
    /// Category the file was selected for.
    pub media_type: MediaType,
    /// Selected file.
    pub file: MediaFile,
    /// Preview reference rendered in the upload region.
    pub preview: PreviewHandle,
    /// [`MediaFile::fingerprint`] for `media_type`.
    pub fingerprint: String,
}

impl MediaSelection {
    /// Hashes `file` once and derives the preview from it.
    ///
    /// Reads every byte; run it off the UI task for large media.
    pub fn prepare(media_type: MediaType, file: MediaFile) -> Self {
        let fingerprint = file.fingerprint(media_type);
        let preview = preview_with(media_type, &file, &fingerprint);
        Self {
            media_type,
            file,
            preview,
            fingerprint,
        }
    }
}

/// Named explanatory factor shown in the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKey {
    /// Sensor/noise consistency.
    NoisePattern,
    /// EXIF and container metadata.
    Metadata,
    /// Generation artifacts.
    Artifacts,
    /// Classifier score.
    NeuralScore,
}

impl FactorKey {
    /// Factors in display order.
    pub const ALL: [FactorKey; 4] = [
        FactorKey::NoisePattern,
        FactorKey::Metadata,
        FactorKey::Artifacts,
        FactorKey::NeuralScore,
    ];

    /// Canonical wire key.
    pub fn as_str(self) -> &'static str {
        match self {
            FactorKey::NoisePattern => "noise_pattern",
            FactorKey::Metadata => "metadata",
            FactorKey::Artifacts => "artifacts",
            FactorKey::NeuralScore => "neural_score",
        }
    }

    /// Row title shown in the result panel.
    pub fn title(self) -> &'static str {
        match self {
            FactorKey::NoisePattern => "Noise Pattern",
            FactorKey::Metadata => "Metadata",
            FactorKey::Artifacts => "Artifacts",
            FactorKey::NeuralScore => "Neural Score",
        }
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisVerdict {
    /// Whether the media was classified as AI-generated.
    pub is_ai_generated: bool,
    /// Confidence in the verdict, in [0, 100].
    pub confidence_percent: f64,
    /// Optional per-factor explanations; missing keys use default copy.
    #[serde(default)]
    pub factors: BTreeMap<FactorKey, String>,
}

impl AnalysisVerdict {
    /// Creates a verdict with clamped confidence and no factor text.
    pub fn new(is_ai_generated: bool, confidence_percent: f64) -> Self {
        Self {
            is_ai_generated,
            confidence_percent: clamp_percent(confidence_percent),
            factors: BTreeMap::new(),
        }
    }

    /// Adds one factor explanation.
    pub fn with_factor(mut self, key: FactorKey, text: impl Into<String>) -> Self {
        self.factors.insert(key, text.into());
        self
    }

    /// Rounded, clamped percentage used for display.
    pub fn display_percent(&self) -> u8 {
        display_percent(self.confidence_percent)
    }
}

/// Normalizes a provider confidence onto the 0-100 scale.
///
/// Values in `[0, 1]` are treated as fractions; anything larger is treated as
/// an already-scaled percentage. The result is clamped to `[0, 100]`.
pub fn normalize_confidence(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }

    if (0.0..=1.0).contains(&raw) {
        return raw * 100.0;
    }

    clamp_percent(raw)
}

/// Clamps a percentage to `[0, 100]`, mapping NaN to zero.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Rounds and clamps a percentage for display.
pub fn display_percent(value: f64) -> u8 {
    clamp_percent(value).round() as u8
}

/// Error type for core model validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// File names cannot be blank.
    #[error("file name is empty")]
    EmptyFileName,
}
