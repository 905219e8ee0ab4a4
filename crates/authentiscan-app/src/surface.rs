//! Presentation seam between the controller and the page.

use std::collections::{HashMap, HashSet};

use authentiscan_core::MediaType;
use authentiscan_ui::{DomPatch, Region, ResultView, Toast, title_for};

/// Host page the controller paints into.
///
/// Implementations apply patches in the order received; the controller relies
/// on that order (loader hidden before a result mounts).
pub trait DomSurface {
    /// Returns a region's current inner markup.
    fn region_markup(&self, region: Region) -> String;

    /// Applies one declarative mutation.
    fn apply(&mut self, patch: DomPatch);
}

/// In-memory page used by the headless shell and tests.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    markup: HashMap<Region, String>,
    highlighted: HashSet<MediaType>,
    cleared_inputs: Vec<MediaType>,
    active_tab: MediaType,
    title: String,
    loader_visible: bool,
    progress_percent: u8,
    progress_label: String,
    result: Option<ResultView>,
    confidence_bar: u8,
    toasts: Vec<Toast>,
    scroll_resets: usize,
    patches: Vec<DomPatch>,
}

impl HeadlessSurface {
    /// Creates a page with the stock upload placeholders.
    pub fn new() -> Self {
        let markup = MediaType::ALL
            .into_iter()
            .filter(|media_type| media_type.accepted_mime_prefix().is_some())
            .map(|media_type| {
                (
                    Region::UploadBox(media_type),
                    default_placeholder(media_type),
                )
            })
            .collect();

        Self {
            markup,
            highlighted: HashSet::new(),
            cleared_inputs: Vec::new(),
            active_tab: MediaType::Image,
            title: title_for(MediaType::Image),
            loader_visible: false,
            progress_percent: 0,
            progress_label: String::new(),
            result: None,
            confidence_bar: 0,
            toasts: Vec::new(),
            scroll_resets: 0,
            patches: Vec::new(),
        }
    }

    /// Every patch applied so far, in order.
    pub fn patches(&self) -> &[DomPatch] {
        &self.patches
    }

    /// Upload box markup for a tab.
    pub fn upload_box(&self, media_type: MediaType) -> &str {
        self.markup
            .get(&Region::UploadBox(media_type))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Whether drag-hover styling is on for a tab.
    pub fn is_highlighted(&self, media_type: MediaType) -> bool {
        self.highlighted.contains(&media_type)
    }

    /// File inputs reset so far.
    pub fn cleared_inputs(&self) -> &[MediaType] {
        &self.cleared_inputs
    }

    /// Active tab.
    pub fn active_tab(&self) -> MediaType {
        self.active_tab
    }

    /// Page title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the loader is shown.
    pub fn loader_visible(&self) -> bool {
        self.loader_visible
    }

    /// Progress bar fill.
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Progress label.
    pub fn progress_label(&self) -> &str {
        &self.progress_label
    }

    /// Mounted result panel.
    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    /// Current confidence bar fill.
    pub fn confidence_bar(&self) -> u8 {
        self.confidence_bar
    }

    /// Toasts shown so far.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Number of scroll-to-top requests.
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSurface for HeadlessSurface {
    fn region_markup(&self, region: Region) -> String {
        self.markup.get(&region).cloned().unwrap_or_default()
    }

    fn apply(&mut self, patch: DomPatch) {
        match &patch {
            DomPatch::ReplaceMarkup { region, markup } => {
                self.markup.insert(*region, markup.clone());
            }
            DomPatch::ClearFileInput(media_type) => self.cleared_inputs.push(*media_type),
            DomPatch::SetDropHighlight { media_type, active } => {
                if *active {
                    self.highlighted.insert(*media_type);
                } else {
                    self.highlighted.remove(media_type);
                }
            }
            DomPatch::ActivateTab { media_type, title } => {
                self.active_tab = *media_type;
                self.title = title.clone();
            }
            DomPatch::SetLoaderVisible(visible) => self.loader_visible = *visible,
            DomPatch::SetProgress { percent, label } => {
                self.progress_percent = *percent;
                self.progress_label = label.clone();
            }
            DomPatch::MountResult(view) => {
                self.result = Some(view.clone());
                self.confidence_bar = 0;
            }
            DomPatch::AnimateConfidence(percent) => self.confidence_bar = *percent,
            DomPatch::ClearResult => {
                self.result = None;
                self.confidence_bar = 0;
            }
            DomPatch::ShowToast(toast) => self.toasts.push(toast.clone()),
            DomPatch::ScrollToTop => self.scroll_resets += 1,
        }
        self.patches.push(patch);
    }
}

fn default_placeholder(media_type: MediaType) -> String {
    format!(
        r#"<div class="upload-placeholder"><i class="fa-solid fa-cloud-arrow-up"></i><p>Drag &amp; drop your {} here or click to browse</p></div>"#,
        media_type.as_str()
    )
}
