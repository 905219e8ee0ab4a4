//! Random verdicts for deployments without a detection backend.

use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use authentiscan_core::AnalysisVerdict;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{DetectError, DetectionRequest, VerdictSource};

/// Default fake latency before a simulated verdict is produced.
pub const DEFAULT_SIMULATED_LATENCY_MS: u64 = 2_000;

const DEFAULT_CONFIDENCE_RANGE: RangeInclusive<f64> = 80.0..=100.0;

/// Fabricates a verdict without inspecting the file.
///
/// The AI flag is a fair coin and the confidence is uniform over the
/// configured range (80-100 by default).
#[derive(Debug)]
pub struct SimulatedSource {
    latency: Duration,
    confidence_range: RangeInclusive<f64>,
    rng: Mutex<StdRng>,
}

impl SimulatedSource {
    /// Creates a source seeded from the OS.
    pub fn new(latency: Duration) -> Self {
        Self::from_rng(latency, StdRng::from_os_rng())
    }

    /// Creates a deterministic source.
    pub fn with_seed(latency: Duration, seed: u64) -> Self {
        Self::from_rng(latency, StdRng::seed_from_u64(seed))
    }

    fn from_rng(latency: Duration, rng: StdRng) -> Self {
        Self {
            latency,
            confidence_range: DEFAULT_CONFIDENCE_RANGE,
            rng: Mutex::new(rng),
        }
    }

    /// Overrides the confidence range, clamped to `[0, 100]`.
    ///
    /// A NaN start reads as 0 and a NaN end as 100.
    pub fn with_confidence_range(mut self, range: RangeInclusive<f64>) -> Self {
        let (start, end) = range.into_inner();
        let low = if start.is_nan() { 0.0 } else { start.clamp(0.0, 100.0) };
        let high = if end.is_nan() { 100.0 } else { end.clamp(low, 100.0) };
        self.confidence_range = low..=high;
        self
    }

    fn draw(&self) -> AnalysisVerdict {
        // A poisoned RNG is still usable.
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let is_ai = rng.random_bool(0.5);
        let confidence = rng.random_range(self.confidence_range.clone());
        AnalysisVerdict::new(is_ai, confidence)
    }
}

#[async_trait]
impl VerdictSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn resolve(&self, request: &DetectionRequest) -> Result<AnalysisVerdict, DetectError> {
        tokio::time::sleep(self.latency).await;
        let verdict = self.draw();
        tracing::debug!(
            media_type = %request.media_type,
            is_ai = verdict.is_ai_generated,
            confidence = verdict.confidence_percent,
            "simulated verdict drawn"
        );
        Ok(verdict)
    }
}
