//! Upload/analyze/result state machine.
//!
//! Handlers run on one task and own [`UiState`] exclusively. Starting an
//! analysis spawns a progress ticker and a verdict fetch that report back over
//! a channel; both messages carry the [`RunId`] of the run that produced them
//! so late arrivals from abandoned runs are dropped instead of painted.

use std::collections::HashMap;
use std::sync::Arc;

use authentiscan_core::{AnalysisVerdict, MediaFile, MediaSelection, MediaType};
use authentiscan_detect::{DetectError, DetectionRequest, VerdictSource, classify_detect_error};
use authentiscan_ui::{
    DomPatch, Phase, ProgressPlan, Region, ResultView, Toast, UiState, preview_markup,
    render_result, title_for,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::AnalysisError;
use crate::surface::DomSurface;

/// Monotonic identifier of one analysis run.
pub type RunId = u64;

/// Message posted by background analysis tasks.
#[derive(Debug)]
pub enum ControllerEvent {
    /// Ticker reached step `step` of the progress plan.
    Progress {
        /// Run the ticker belongs to.
        run: RunId,
        /// Index into the plan's steps.
        step: usize,
    },
    /// Verdict source settled.
    Verdict {
        /// Run the request belongs to.
        run: RunId,
        /// Verdict or failure.
        result: Result<AnalysisVerdict, DetectError>,
    },
}

/// Whether the host should suppress the browser default for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Call `preventDefault`.
    PreventDefault,
    /// Let the browser handle the event.
    Default,
}

/// Result of dropping a file on an upload box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    /// Always [`EventDisposition::PreventDefault`] so the browser never
    /// navigates to the dropped file.
    pub disposition: EventDisposition,
    /// Whether the drop became the current selection.
    pub accepted: bool,
}

/// Terminal state of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Verdict rendered.
    Done(ResultView),
    /// Verdict source failed; controller is idle with selection intact.
    Failed(AnalysisError),
}

/// Single owner of page state for the upload/analyze/result flow.
pub struct UploadAnalysisController<S: DomSurface> {
    state: UiState,
    surface: S,
    source: Arc<dyn VerdictSource>,
    plan: Arc<ProgressPlan>,
    placeholders: HashMap<MediaType, String>,
    last_run: RunId,
    active_run: Option<RunId>,
    ticker: Option<JoinHandle<()>>,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl<S: DomSurface> UploadAnalysisController<S> {
    /// Creates a controller and captures each upload box's placeholder markup.
    pub fn new(surface: S, source: Arc<dyn VerdictSource>, plan: ProgressPlan) -> Self {
        let placeholders = MediaType::ALL
            .into_iter()
            .filter(|media_type| media_type.accepted_mime_prefix().is_some())
            .map(|media_type| {
                (
                    media_type,
                    surface.region_markup(Region::UploadBox(media_type)),
                )
            })
            .collect();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        tracing::info!(source = source.name(), "upload controller ready");

        Self {
            state: UiState::new(),
            surface,
            source,
            plan: Arc::new(plan),
            placeholders,
            last_run: 0,
            active_run: None,
            ticker: None,
            events_tx,
            events_rx,
        }
    }

    /// Current page state.
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Host surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the controller and returns the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Updates login status; logging out leaves any premium tab.
    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.state.is_logged_in = logged_in;
        if !logged_in && self.state.active_media_type.is_premium() {
            self.activate(MediaType::Image);
        }
    }

    /// Switches the active tab.
    ///
    /// Any selection, result, or pending run is dropped, even mid-analysis.
    ///
    /// # Errors
    /// Returns [`AnalysisError::PremiumLocked`] for premium tabs while logged
    /// out; the active tab is unchanged.
    pub fn switch_media_type(&mut self, media_type: MediaType) -> Result<(), AnalysisError> {
        if !self.state.can_activate(media_type) {
            let error = AnalysisError::PremiumLocked(media_type);
            self.notify(Toast::warning(error.user_message()));
            return Err(error);
        }

        self.activate(media_type);
        Ok(())
    }

    fn activate(&mut self, media_type: MediaType) {
        let previous = self.state.active_media_type;
        self.abandon_run();
        self.clear_result();
        if let Some(selection) = self.state.uploaded_file.take() {
            self.restore_placeholder(selection.media_type);
        }
        self.state.active_media_type = media_type;
        self.surface.apply(DomPatch::ActivateTab {
            media_type,
            title: title_for(media_type),
        });

        tracing::info!(from = %previous, to = %media_type, "media type switched");
    }

    /// Replaces the selection for `media_type` with `file`.
    ///
    /// A cancelled picker (`None`) is a no-op. The file is hashed and its
    /// preview built off the UI task, then swapped into the upload box in one
    /// patch.
    ///
    /// # Errors
    /// Returns [`AnalysisError::UnsupportedFile`] when the MIME type does not
    /// match the tab, [`AnalysisError::InactiveMediaType`] when the tab is not
    /// active, and [`AnalysisError::AnalysisInProgress`] while analyzing.
    pub async fn select_file(
        &mut self,
        media_type: MediaType,
        file: Option<MediaFile>,
    ) -> Result<(), AnalysisError> {
        let Some(file) = file else {
            tracing::debug!(media_type = %media_type, "file dialog cancelled");
            return Ok(());
        };

        if media_type != self.state.active_media_type {
            return Err(AnalysisError::InactiveMediaType(media_type));
        }
        if self.state.is_analyzing() {
            let error = AnalysisError::AnalysisInProgress;
            self.notify(Toast::warning(error.user_message()));
            return Err(error);
        }
        if !media_type.accepts_mime(&file.mime_type) {
            let error = AnalysisError::UnsupportedFile {
                media_type,
                mime_type: file.mime_type.clone(),
            };
            self.notify(Toast::warning(error.user_message()));
            return Err(error);
        }

        let selection =
            tokio::task::spawn_blocking(move || MediaSelection::prepare(media_type, file))
                .await
                .map_err(|error| AnalysisError::PreviewFailed(error.to_string()))?;

        tracing::info!(
            media_type = %media_type,
            name = %selection.file.name,
            size = selection.file.size(),
            fingerprint = selection.fingerprint.get(..12).unwrap_or_default(),
            "file selected"
        );

        self.clear_result();
        self.surface.apply(DomPatch::ReplaceMarkup {
            region: Region::UploadBox(media_type),
            markup: preview_markup(&selection),
        });
        self.state.uploaded_file = Some(selection);
        Ok(())
    }

    /// Removes the selection for `media_type` and restores its placeholder.
    pub fn clear_selection(&mut self, media_type: MediaType) {
        let owns_selection = self
            .state
            .uploaded_file
            .as_ref()
            .is_some_and(|selection| selection.media_type == media_type);
        if owns_selection {
            if self.state.is_analyzing() {
                self.abandon_run();
            }
            self.state.uploaded_file = None;
        }
        self.restore_placeholder(media_type);
        tracing::debug!(media_type = %media_type, "selection cleared");
    }

    /// Drag entered an upload box.
    pub fn drag_enter(&mut self, media_type: MediaType) -> EventDisposition {
        if media_type == self.state.active_media_type {
            self.surface.apply(DomPatch::SetDropHighlight {
                media_type,
                active: true,
            });
        }
        EventDisposition::PreventDefault
    }

    /// Drag moved over an upload box.
    pub fn drag_over(&mut self, _media_type: MediaType) -> EventDisposition {
        EventDisposition::PreventDefault
    }

    /// Drag left an upload box.
    pub fn drag_leave(&mut self, media_type: MediaType) -> EventDisposition {
        self.surface.apply(DomPatch::SetDropHighlight {
            media_type,
            active: false,
        });
        EventDisposition::PreventDefault
    }

    /// File dropped on an upload box.
    ///
    /// Only the box of the active tab accepts drops; the first file is used.
    pub async fn drop_file(&mut self, media_type: MediaType, file: Option<MediaFile>) -> DropOutcome {
        self.surface.apply(DomPatch::SetDropHighlight {
            media_type,
            active: false,
        });

        let accepted = if media_type != self.state.active_media_type {
            tracing::debug!(
                region = %media_type,
                active = %self.state.active_media_type,
                "drop on inactive upload box ignored"
            );
            false
        } else {
            let had_file = file.is_some();
            self.select_file(media_type, file).await.is_ok() && had_file
        };

        DropOutcome {
            disposition: EventDisposition::PreventDefault,
            accepted,
        }
    }

    /// Starts an analysis run for the current selection.
    ///
    /// Must be called inside a Tokio runtime: the progress ticker and the
    /// verdict fetch are spawned as independent tasks.
    ///
    /// # Errors
    /// Returns [`AnalysisError::NoFileSelected`] (with one warning toast and no
    /// loader) when nothing is selected, or
    /// [`AnalysisError::AnalysisInProgress`] when a run is already pending.
    pub fn start_analysis(&mut self) -> Result<RunId, AnalysisError> {
        if self.state.is_analyzing() {
            return Err(AnalysisError::AnalysisInProgress);
        }
        let Some(selection) = self.state.uploaded_file.as_ref() else {
            let error = AnalysisError::NoFileSelected(self.state.active_media_type);
            self.notify(Toast::warning(error.user_message()));
            tracing::warn!(media_type = %self.state.active_media_type, "analysis requested without a file");
            return Err(error);
        };
        let request = DetectionRequest {
            media_type: selection.media_type,
            file: selection.file.clone(),
        };

        self.clear_result();
        self.last_run += 1;
        let run = self.last_run;
        self.active_run = Some(run);
        self.state.phase = Phase::Analyzing;
        self.set_progress(0, "Starting analysis...");
        self.surface.apply(DomPatch::SetLoaderVisible(true));

        tracing::info!(
            run,
            source = self.source.name(),
            media_type = %request.media_type,
            "analysis started"
        );

        let plan = Arc::clone(&self.plan);
        let ticker_tx = self.events_tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            for step in 0..plan.steps.len() {
                tokio::time::sleep(plan.interval).await;
                if ticker_tx.send(ControllerEvent::Progress { run, step }).is_err() {
                    break;
                }
            }
        }));

        // The fetch is never aborted; stale results are dropped by run id.
        let source = Arc::clone(&self.source);
        let verdict_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = source.resolve(&request).await;
            let _ = verdict_tx.send(ControllerEvent::Verdict { run, result });
        });

        Ok(run)
    }

    /// Waits for the next background event.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Applies one background event.
    ///
    /// Returns the run's outcome when `event` settles the active run.
    pub fn handle_event(&mut self, event: ControllerEvent) -> Option<AnalysisOutcome> {
        match event {
            ControllerEvent::Progress { run, step } => {
                if self.active_run != Some(run) {
                    return None;
                }
                if let Some(progress) = self.plan.steps.get(step).cloned() {
                    tracing::debug!(run, percent = progress.percent, "progress step");
                    self.set_progress(progress.percent, &progress.label);
                }
                None
            }
            ControllerEvent::Verdict { run, result } => {
                if self.active_run != Some(run) {
                    tracing::debug!(run, active = ?self.active_run, "discarding stale verdict");
                    return None;
                }
                Some(self.finish_run(run, result))
            }
        }
    }

    /// Pumps events until the active run settles.
    ///
    /// Returns `None` when no run is active.
    pub async fn settle(&mut self) -> Option<AnalysisOutcome> {
        while self.state.is_analyzing() {
            let event = self.next_event().await?;
            if let Some(outcome) = self.handle_event(event) {
                return Some(outcome);
            }
        }
        None
    }

    /// Starts a run and waits for its result.
    ///
    /// # Errors
    /// Returns the start error, or the classified failure of the run.
    pub async fn analyze(&mut self) -> Result<ResultView, AnalysisError> {
        self.start_analysis()?;
        match self.settle().await {
            Some(AnalysisOutcome::Done(view)) => Ok(view),
            Some(AnalysisOutcome::Failed(error)) => Err(error),
            None => Err(AnalysisError::Cancelled),
        }
    }

    /// Returns to the initial page state ("Analyze Another").
    pub fn reset(&mut self) {
        self.abandon_run();
        let uploadable: Vec<MediaType> = self.placeholders.keys().copied().collect();
        for media_type in uploadable {
            self.restore_placeholder(media_type);
        }
        self.state.uploaded_file = None;
        self.clear_result();
        self.surface.apply(DomPatch::ScrollToTop);
        tracing::info!("controller reset");
    }

    fn finish_run(
        &mut self,
        run: RunId,
        result: Result<AnalysisVerdict, DetectError>,
    ) -> AnalysisOutcome {
        self.stop_ticker();
        self.active_run = None;
        self.surface.apply(DomPatch::SetLoaderVisible(false));

        match result {
            Ok(verdict) => {
                let view = render_result(self.state.active_media_type, &verdict);
                let percent = view.panel().confidence_percent;
                self.surface.apply(DomPatch::MountResult(view.clone()));
                self.surface.apply(DomPatch::AnimateConfidence(percent));
                self.state.live_verdict = Some(verdict);
                self.state.phase = Phase::Done;

                tracing::info!(run, ai = view.is_ai_detected(), percent, "verdict rendered");
                AnalysisOutcome::Done(view)
            }
            Err(error) => {
                let class = classify_detect_error(&error);
                self.set_progress(0, "");
                self.state.phase = Phase::Idle;
                self.notify(Toast::error(class.user_message()));

                tracing::warn!(run, %error, ?class, "analysis failed");
                AnalysisOutcome::Failed(AnalysisError::from(error))
            }
        }
    }

    fn abandon_run(&mut self) {
        self.stop_ticker();
        if let Some(run) = self.active_run.take() {
            tracing::info!(run, "analysis run abandoned");
        }
        self.surface.apply(DomPatch::SetLoaderVisible(false));
        self.set_progress(0, "");
        self.state.phase = Phase::Idle;
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn clear_result(&mut self) {
        self.state.live_verdict = None;
        if self.state.phase == Phase::Done {
            self.state.phase = Phase::Idle;
        }
        self.surface.apply(DomPatch::ClearResult);
    }

    fn restore_placeholder(&mut self, media_type: MediaType) {
        self.surface.apply(DomPatch::ClearFileInput(media_type));
        if let Some(markup) = self.placeholders.get(&media_type) {
            self.surface.apply(DomPatch::ReplaceMarkup {
                region: Region::UploadBox(media_type),
                markup: markup.clone(),
            });
        }
    }

    fn set_progress(&mut self, percent: u8, label: &str) {
        self.state.progress_percent = percent;
        self.surface.apply(DomPatch::SetProgress {
            percent,
            label: label.to_string(),
        });
    }

    fn notify(&mut self, toast: Toast) {
        self.surface.apply(DomPatch::ShowToast(toast));
    }
}
