//! Shared fixtures for controller integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use authentiscan_app::{HeadlessSurface, UploadAnalysisController};
use authentiscan_core::{AnalysisVerdict, MediaFile};
use authentiscan_detect::{DetectError, DetectionRequest, VerdictSource};
use authentiscan_ui::ProgressPlan;

/// One scripted reply: delay before settling, then the result.
pub type Reply = (Duration, Result<AnalysisVerdict, DetectError>);

/// Verdict source replaying scripted replies in call order.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<DetectionRequest>>,
}

impl ScriptedSource {
    /// Creates a source from replies.
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<DetectionRequest> {
        self.requests.lock().expect("request lock should work").clone()
    }
}

#[async_trait]
impl VerdictSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn resolve(&self, request: &DetectionRequest) -> Result<AnalysisVerdict, DetectError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(request.clone());
        let reply = self
            .replies
            .lock()
            .expect("reply lock should work")
            .pop_front();
        let (delay, result) =
            reply.unwrap_or((Duration::ZERO, Err(DetectError::Request("script exhausted".to_string()))));
        tokio::time::sleep(delay).await;
        result
    }
}

/// Builds a controller over a headless page with the default 800 ms plan.
pub fn controller(source: Arc<ScriptedSource>) -> UploadAnalysisController<HeadlessSurface> {
    UploadAnalysisController::new(HeadlessSurface::new(), source, ProgressPlan::default())
}

/// `cat.png` fixture.
pub fn cat_png() -> MediaFile {
    MediaFile::new("cat.png", "image/png", vec![137, 80, 78, 71, 13, 10, 26, 10])
        .expect("fixture file should be valid")
}

/// `clip.mp4` fixture.
#[allow(dead_code)]
pub fn clip_mp4() -> MediaFile {
    MediaFile::new("clip.mp4", "video/mp4", vec![0, 0, 0, 24, 102, 116, 121, 112])
        .expect("fixture file should be valid")
}

/// Reply settling after `ms` milliseconds with `verdict`.
#[allow(dead_code)]
pub fn ok_after(ms: u64, verdict: AnalysisVerdict) -> Reply {
    (Duration::from_millis(ms), Ok(verdict))
}

/// Reply failing after `ms` milliseconds with `error`.
#[allow(dead_code)]
pub fn err_after(ms: u64, error: DetectError) -> Reply {
    (Duration::from_millis(ms), Err(error))
}
