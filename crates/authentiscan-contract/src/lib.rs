#![warn(missing_docs)]
//! # authentiscan-contract
//!
//! ## Purpose
//! Defines the detection service response contract and maps provider payloads
//! onto the canonical [`AnalysisVerdict`].
//!
//! ## Responsibilities
//! - Parse JSON bodies that use any of several accepted key names per field.
//! - Normalize confidence values given either as fractions or percentages.
//! - Derive the AI flag from a raw score and threshold when no flag is sent.
//! - Collect optional factor explanations from the details object.
//!
//! ## Data flow
//! Raw JSON body -> [`parse_detection_response`] -> [`map_verdict`] ->
//! result renderer.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned so they outlive the transient response buffer.
//!
//! ## Error model
//! Invalid JSON returns [`ContractError::Decode`]; a body that lacks both an
//! AI flag and any usable score returns [`ContractError::InvalidContract`].
//! Callers treat both as a malformed response.

use authentiscan_core::{AnalysisVerdict, FactorKey, clamp_percent, normalize_confidence};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Default decision threshold applied to raw AI scores in `[0, 1]`.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Wrapper keys some providers nest the verdict under.
const ENVELOPE_KEYS: [&str; 2] = ["result", "data"];

/// Accepted key names per response field, canonical name first.
///
/// When a body carries several spellings of one field, the first non-null
/// one in this order wins.
const RESPONSE_FIELDS: [(&str, &[&str]); 4] = [
    (
        "is_ai_generated",
        &["is_ai_generated", "isAIGenerated", "is_ai", "isAI", "ai_generated", "aiGenerated"],
    ),
    ("confidence", &["confidence", "confidence_score", "confidenceScore"]),
    ("ai_score", &["ai_score", "aiScore", "score", "probability"]),
    ("details", &["details", "analysis", "factors"]),
];

/// Accepted key names per details field, canonical name first.
const DETAIL_FIELDS: [(&str, &[&str]); 4] = [
    ("noise_pattern", &["noise_pattern", "noise", "noisePattern"]),
    ("metadata", &["metadata"]),
    ("artifacts", &["artifacts"]),
    ("neural_score", &["neural_score", "neural", "neuralScore"]),
];

/// Number of leading [`RESPONSE_FIELDS`] entries that carry the verdict.
const VERDICT_FIELD_COUNT: usize = 3;

/// Detection response in canonical field names.
///
/// Build it with [`parse_detection_response`], which folds provider aliases
/// onto these names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectionResponse {
    /// Explicit AI-generated flag.
    #[serde(default)]
    pub is_ai_generated: Option<bool>,
    /// Confidence in the reported verdict.
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Raw probability that the media is AI-generated.
    #[serde(default)]
    pub ai_score: Option<f64>,
    /// Optional factor explanations.
    #[serde(default)]
    pub details: Option<DetectionDetails>,
}

/// Per-factor explanations reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectionDetails {
    /// Noise pattern finding.
    #[serde(default)]
    pub noise_pattern: Option<FactorValue>,
    /// Metadata finding.
    #[serde(default)]
    pub metadata: Option<FactorValue>,
    /// Artifact finding.
    #[serde(default)]
    pub artifacts: Option<FactorValue>,
    /// Classifier score finding.
    #[serde(default)]
    pub neural_score: Option<FactorValue>,
}

/// A factor value, which providers send as text, numbers, or flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    /// Human-readable text.
    Text(String),
    /// Numeric score.
    Number(f64),
    /// Boolean finding.
    Flag(bool),
    /// Any other shape; rendered with the default copy.
    Other(Value),
}

impl FactorValue {
    fn into_text(self) -> Option<String> {
        match self {
            FactorValue::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            FactorValue::Number(value) => Some(format_number(value)),
            FactorValue::Flag(true) => Some("Detected".to_string()),
            FactorValue::Flag(false) => Some("Not detected".to_string()),
            FactorValue::Other(_) => None,
        }
    }
}

/// Tuning for verdict mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingPolicy {
    /// Score above which a flag-less response is classified as AI, in `[0, 1]`.
    pub threshold: f64,
}

impl Default for MappingPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Parses a raw JSON body into a provider response.
///
/// A body with no verdict field at the top level is unwrapped from its
/// `result` or `data` object first. Aliased keys are then folded onto the
/// canonical names, and a `details` value that is not an object is ignored.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON or wrongly typed fields.
/// Returns [`ContractError::InvalidContract`] when the body is not an object.
pub fn parse_detection_response(raw: &str) -> Result<DetectionResponse, ContractError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut root) = value else {
        return Err(ContractError::InvalidContract(
            "response body is not a JSON object".to_string(),
        ));
    };

    if !has_verdict_field(&root) {
        for key in ENVELOPE_KEYS {
            if matches!(root.get(key), Some(Value::Object(_))) {
                if let Some(Value::Object(inner)) = root.remove(key) {
                    root = inner;
                }
                break;
            }
        }
    }

    fold_aliases(&mut root, &RESPONSE_FIELDS);
    match root.get_mut("details") {
        Some(Value::Object(details)) => fold_aliases(details, &DETAIL_FIELDS),
        Some(_) => {
            root.remove("details");
        }
        None => {}
    }

    Ok(serde_json::from_value(Value::Object(root))?)
}

fn has_verdict_field(object: &Map<String, Value>) -> bool {
    RESPONSE_FIELDS[..VERDICT_FIELD_COUNT]
        .iter()
        .flat_map(|(_, aliases)| aliases.iter())
        .any(|alias| object.get(*alias).is_some_and(|value| !value.is_null()))
}

fn fold_aliases(object: &mut Map<String, Value>, fields: &[(&str, &[&str])]) {
    for (canonical, aliases) in fields {
        let mut chosen = None;
        for alias in aliases.iter() {
            if let Some(value) = object.remove(*alias) {
                if chosen.is_none() && !value.is_null() {
                    chosen = Some(value);
                }
            }
        }
        if let Some(value) = chosen {
            object.insert((*canonical).to_string(), value);
        }
    }
}

/// Maps a provider response onto the canonical verdict.
///
/// Resolution order:
/// - flag and confidence present: used as-is.
/// - flag and raw score present: confidence is the score for AI verdicts and
///   its complement otherwise.
/// - only a raw score present: flag is `score > threshold`.
///
/// # Errors
/// Returns [`ContractError::InvalidContract`] when no verdict can be derived.
pub fn map_verdict(
    response: DetectionResponse,
    policy: &MappingPolicy,
) -> Result<AnalysisVerdict, ContractError> {
    let confidence = response.confidence.map(normalize_confidence);
    let score = response.ai_score.map(normalize_confidence);

    let (is_ai, confidence_percent) = match (response.is_ai_generated, confidence, score) {
        (Some(flag), Some(confidence), _) => (flag, confidence),
        (Some(flag), None, Some(score)) => (flag, score_confidence(flag, score)),
        (None, _, Some(score)) => {
            let flag = score > clamp_percent(policy.threshold * 100.0);
            (flag, score_confidence(flag, score))
        }
        (Some(_), None, None) => {
            return Err(ContractError::InvalidContract(
                "response carries an AI flag but no confidence".to_string(),
            ));
        }
        (None, _, None) => {
            return Err(ContractError::InvalidContract(
                "response carries neither an AI flag nor a score".to_string(),
            ));
        }
    };

    let mut verdict = AnalysisVerdict::new(is_ai, confidence_percent);
    if let Some(details) = response.details {
        let entries = [
            (FactorKey::NoisePattern, details.noise_pattern),
            (FactorKey::Metadata, details.metadata),
            (FactorKey::Artifacts, details.artifacts),
            (FactorKey::NeuralScore, details.neural_score),
        ];
        for (key, value) in entries {
            if let Some(text) = value.and_then(FactorValue::into_text) {
                verdict.factors.insert(key, text);
            }
        }
    }

    Ok(verdict)
}

/// Parses and maps in one step.
///
/// # Errors
/// See [`parse_detection_response`] and [`map_verdict`].
pub fn verdict_from_body(raw: &str, policy: &MappingPolicy) -> Result<AnalysisVerdict, ContractError> {
    map_verdict(parse_detection_response(raw)?, policy)
}

fn score_confidence(is_ai: bool, score: f64) -> f64 {
    if is_ai { score } else { 100.0 - score }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Detection contract errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure.
    #[error("detection response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("detection response contract violation: {0}")]
    InvalidContract(String),
}
