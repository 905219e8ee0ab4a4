#![warn(missing_docs)]
//! # authentiscan-ui
//!
//! ## Purpose
//! Defines the presentation model for the upload/analyze/result page.
//!
//! ## Responsibilities
//! - Represent page state ([`UiState`]) and the analysis [`Phase`].
//! - Describe the progress step sequence shown while analyzing.
//! - Render a verdict into one of two fixed [`ResultView`] layouts.
//! - Describe DOM mutations declaratively as [`DomPatch`] values.
//!
//! ## Data flow
//! Controller handlers mutate [`UiState`] and emit [`DomPatch`] lists that a
//! host surface applies to the page.
//!
//! ## Ownership and lifetimes
//! Views and patches own their strings so they can cross task boundaries.
//!
//! ## Error model
//! Rendering is total: every verdict renders, missing factors fall back to
//! default copy, and confidence is clamped.

use std::time::Duration;

use authentiscan_core::{
    AnalysisVerdict, FactorKey, MediaSelection, MediaType, PreviewHandle, display_percent,
};

/// Default progress cadence.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(800);

/// Default lifetime of a toast notification.
pub const TOAST_DISMISS_MS: u64 = 3_000;

/// Label of the reset affordance on result panels.
pub const RESET_LABEL: &str = "Analyze Another";

/// Analysis lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the user.
    Idle,
    /// Loader visible, verdict pending.
    Analyzing,
    /// Result panel visible.
    Done,
}

/// Aggregate page state, mutated only by controller handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Tab currently shown.
    pub active_media_type: MediaType,
    /// Current selection, if any.
    pub uploaded_file: Option<MediaSelection>,
    /// Analysis lifecycle phase.
    pub phase: Phase,
    /// Whether premium tabs are unlocked.
    pub is_logged_in: bool,
    /// Verdict currently displayed.
    pub live_verdict: Option<AnalysisVerdict>,
    /// Progress bar fill in percent.
    pub progress_percent: u8,
}

impl UiState {
    /// Creates the initial state on the image tab.
    pub fn new() -> Self {
        Self {
            active_media_type: MediaType::Image,
            uploaded_file: None,
            phase: Phase::Idle,
            is_logged_in: false,
            live_verdict: None,
            progress_percent: 0,
        }
    }

    /// Returns `true` while a verdict is pending.
    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }

    /// Returns `true` when analysis may start.
    pub fn can_start_analysis(&self) -> bool {
        self.uploaded_file.is_some() && !self.is_analyzing()
    }

    /// Returns `true` when `media_type` may be activated.
    pub fn can_activate(&self, media_type: MediaType) -> bool {
        !media_type.is_premium() || self.is_logged_in
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// One step of the progress ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStep {
    /// Bar fill in percent.
    pub percent: u8,
    /// Status label under the bar.
    pub label: String,
}

/// Progress sequence advanced on a fixed cadence while analyzing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressPlan {
    /// Delay between consecutive steps.
    pub interval: Duration,
    /// Steps in display order.
    pub steps: Vec<ProgressStep>,
}

impl ProgressPlan {
    /// Creates the default six-step plan with the given cadence.
    pub fn with_interval(interval: Duration) -> Self {
        let steps = [
            (15, "Uploading file..."),
            (35, "Analyzing noise patterns..."),
            (55, "Checking metadata..."),
            (75, "Detecting generation artifacts..."),
            (90, "Running neural classifier..."),
            (100, "Finalizing results..."),
        ]
        .into_iter()
        .map(|(percent, label)| ProgressStep {
            percent,
            label: label.to_string(),
        })
        .collect();

        Self { interval, steps }
    }
}

impl Default for ProgressPlan {
    fn default() -> Self {
        Self::with_interval(DEFAULT_PROGRESS_INTERVAL)
    }
}

/// One explanatory row in a result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorRow {
    /// Factor identity.
    pub key: FactorKey,
    /// Row title.
    pub title: String,
    /// Row body, provider text or default copy.
    pub text: String,
}

/// Content shared by both result layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    /// Badge headline, e.g. "It's AI Made Image".
    pub headline: String,
    /// Label above the confidence bar.
    pub confidence_label: String,
    /// Target bar fill, rounded and clamped.
    pub confidence_percent: u8,
    /// Percentage text, e.g. "91%".
    pub confidence_text: String,
    /// Summary line, e.g. "91% Detected".
    pub summary: String,
    /// Four factor rows in display order.
    pub factors: Vec<FactorRow>,
    /// Reset affordance label.
    pub reset_label: String,
}

/// The two fixed result layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Media judged AI-generated.
    AiDetected(ResultPanel),
    /// Media judged authentic.
    Authentic(ResultPanel),
}

impl ResultView {
    /// Shared panel content.
    pub fn panel(&self) -> &ResultPanel {
        match self {
            ResultView::AiDetected(panel) | ResultView::Authentic(panel) => panel,
        }
    }

    /// Returns `true` for the AI-detected layout.
    pub fn is_ai_detected(&self) -> bool {
        matches!(self, ResultView::AiDetected(_))
    }
}

/// Renders a verdict into its result layout.
pub fn render_result(media_type: MediaType, verdict: &AnalysisVerdict) -> ResultView {
    let percent = display_percent(verdict.confidence_percent);
    let is_ai = verdict.is_ai_generated;

    let factors = FactorKey::ALL
        .into_iter()
        .map(|key| FactorRow {
            key,
            title: key.title().to_string(),
            text: verdict
                .factors
                .get(&key)
                .cloned()
                .unwrap_or_else(|| default_factor_text(key, is_ai).to_string()),
        })
        .collect();

    let (headline, confidence_label, summary) = if is_ai {
        (
            format!("It's AI Made {}", media_type.label()),
            "AI Confidence",
            format!("{percent}% Detected"),
        )
    } else {
        (
            format!("It's Real {}", media_type.label()),
            "Authenticity Score",
            format!("{percent}% Authentic"),
        )
    };

    let panel = ResultPanel {
        headline,
        confidence_label: confidence_label.to_string(),
        confidence_percent: percent,
        confidence_text: format!("{percent}%"),
        summary,
        factors,
        reset_label: RESET_LABEL.to_string(),
    };

    if is_ai {
        ResultView::AiDetected(panel)
    } else {
        ResultView::Authentic(panel)
    }
}

/// Default copy for a factor the provider did not explain.
pub fn default_factor_text(key: FactorKey, is_ai: bool) -> &'static str {
    match (key, is_ai) {
        (FactorKey::NoisePattern, true) => "Unnatural noise distribution detected",
        (FactorKey::NoisePattern, false) => "Natural sensor noise pattern",
        (FactorKey::Metadata, true) => "Missing or inconsistent camera metadata",
        (FactorKey::Metadata, false) => "Consistent capture metadata",
        (FactorKey::Artifacts, true) => "Generation artifacts present",
        (FactorKey::Artifacts, false) => "No generation artifacts found",
        (FactorKey::NeuralScore, true) => "Classifier indicates synthetic origin",
        (FactorKey::NeuralScore, false) => "Classifier indicates authentic origin",
    }
}

/// Page title for a tab.
pub fn title_for(media_type: MediaType) -> String {
    format!("Analyze {} Reality", media_type.label())
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Informational.
    Info,
    /// Recoverable user mistake.
    Warning,
    /// Failed operation.
    Error,
}

/// Transient, auto-dismissing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity.
    pub level: ToastLevel,
    /// Message text.
    pub message: String,
    /// Auto-dismiss delay.
    pub dismiss_after_ms: u64,
}

impl Toast {
    /// Creates a warning toast.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message)
    }

    /// Creates an error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    /// Creates an info toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            dismiss_after_ms: TOAST_DISMISS_MS,
        }
    }
}

/// Named page regions the controller writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Drop target and preview container for a tab.
    UploadBox(MediaType),
}

/// Declarative DOM mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomPatch {
    /// Replaces a region's inner markup in one swap.
    ReplaceMarkup {
        /// Target region.
        region: Region,
        /// Complete new markup.
        markup: String,
    },
    /// Resets a file input's value.
    ClearFileInput(MediaType),
    /// Toggles drag-hover styling on an upload box.
    SetDropHighlight {
        /// Upload box tab.
        media_type: MediaType,
        /// Whether hover styling is on.
        active: bool,
    },
    /// Marks one tab active and updates the page title.
    ActivateTab {
        /// Tab to activate.
        media_type: MediaType,
        /// New page title.
        title: String,
    },
    /// Shows or hides the analysis loader.
    SetLoaderVisible(bool),
    /// Moves the progress bar.
    SetProgress {
        /// Bar fill.
        percent: u8,
        /// Status label.
        label: String,
    },
    /// Mounts a result panel with its confidence bar at 0%.
    MountResult(ResultView),
    /// Animates the mounted confidence bar to its target fill.
    AnimateConfidence(u8),
    /// Empties the result area.
    ClearResult,
    /// Shows a toast.
    ShowToast(Toast),
    /// Scrolls the page to the top.
    ScrollToTop,
}

/// Markup swapped into an upload box once a preview is ready.
pub fn preview_markup(selection: &MediaSelection) -> String {
    let media = selection.media_type.as_str();
    let src = escape_attr(selection.preview.src());
    let name = escape_attr(&selection.file.name);
    let remove = format!(
        r#"<button class="preview-remove" data-action="clear" data-type="{media}" aria-label="Remove {name}">&times;</button>"#
    );

    let body = match (&selection.preview, selection.media_type) {
        (PreviewHandle::DataUrl(_), _) | (_, MediaType::Image) => {
            format!(r#"<img src="{src}" alt="{name}" class="preview-media">"#)
        }
        (PreviewHandle::ObjectUrl(_), MediaType::Audio) => format!(
            r#"<audio controls class="preview-media"><source src="{src}" type="{}"></audio>"#,
            escape_attr(&selection.file.mime_type)
        ),
        (PreviewHandle::ObjectUrl(_), _) => format!(
            r#"<video controls class="preview-media"><source src="{src}" type="{}"></video>"#,
            escape_attr(&selection.file.mime_type)
        ),
    };

    format!(r#"<div class="preview" data-type="{media}">{body}{remove}</div>"#)
}

fn escape_attr(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for character in raw.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
