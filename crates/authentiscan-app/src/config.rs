//! Environment-driven runtime configuration.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use authentiscan_contract::{DEFAULT_THRESHOLD, MappingPolicy};
use authentiscan_detect::{
    ApiKey, DEFAULT_SIMULATED_LATENCY_MS, RemoteConfig, RemoteSource, SimulatedSource,
    VerdictSource,
};
use authentiscan_ui::{DEFAULT_PROGRESS_INTERVAL, ProgressPlan};
use thiserror::Error;

/// Verdict strategy selector.
pub const ENV_STRATEGY: &str = "AUTHENTISCAN_STRATEGY";
/// Detection endpoint URL.
pub const ENV_API_URL: &str = "AUTHENTISCAN_API_URL";
/// Detection bearer credential.
pub const ENV_API_KEY: &str = "AUTHENTISCAN_API_KEY";
/// Score threshold in `[0, 1]`.
pub const ENV_THRESHOLD: &str = "AUTHENTISCAN_THRESHOLD";
/// Remote request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "AUTHENTISCAN_TIMEOUT_SECS";
/// Progress cadence in milliseconds.
pub const ENV_PROGRESS_INTERVAL_MS: &str = "AUTHENTISCAN_PROGRESS_INTERVAL_MS";
/// Simulated verdict latency in milliseconds.
pub const ENV_SIMULATED_LATENCY_MS: &str = "AUTHENTISCAN_SIMULATED_LATENCY_MS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How verdicts are obtained in this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Random verdicts after a fake delay.
    Simulated,
    /// Detection endpoint over HTTP.
    Remote,
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simulated" | "mock" => Ok(Strategy::Simulated),
            "remote" | "api" => Ok(Strategy::Remote),
            other => Err(ConfigError::InvalidValue {
                key: ENV_STRATEGY,
                value: other.to_string(),
            }),
        }
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verdict strategy.
    pub strategy: Strategy,
    /// Endpoint URL, required for [`Strategy::Remote`].
    pub api_url: Option<String>,
    /// Credential, required for [`Strategy::Remote`].
    pub api_key: Option<ApiKey>,
    /// Score threshold in `[0, 1]`.
    pub threshold: f64,
    /// Remote request timeout.
    pub timeout: Duration,
    /// Progress cadence.
    pub progress_interval: Duration,
    /// Simulated verdict latency.
    pub simulated_latency: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Simulated,
            api_url: None,
            api_key: None,
            threshold: DEFAULT_THRESHOLD,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            simulated_latency: Duration::from_millis(DEFAULT_SIMULATED_LATENCY_MS),
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment.
    ///
    /// # Errors
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value.
    ///
    /// Unset or blank variables fall back to defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for unparsable values and
    /// [`ConfigError::Missing`] when the remote strategy lacks URL or key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = read(ENV_STRATEGY) {
            config.strategy = raw.parse()?;
        }
        config.api_url = read(ENV_API_URL).map(|value| value.trim().to_string());
        config.api_key = read(ENV_API_KEY).and_then(|value| ApiKey::new(value).ok());

        if let Some(raw) = read(ENV_THRESHOLD) {
            let threshold: f64 = parse_value(ENV_THRESHOLD, &raw)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::InvalidValue {
                    key: ENV_THRESHOLD,
                    value: raw,
                });
            }
            config.threshold = threshold;
        }
        if let Some(raw) = read(ENV_TIMEOUT_SECS) {
            config.timeout = Duration::from_secs(parse_value(ENV_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = read(ENV_PROGRESS_INTERVAL_MS) {
            config.progress_interval =
                Duration::from_millis(parse_value(ENV_PROGRESS_INTERVAL_MS, &raw)?);
        }
        if let Some(raw) = read(ENV_SIMULATED_LATENCY_MS) {
            config.simulated_latency =
                Duration::from_millis(parse_value(ENV_SIMULATED_LATENCY_MS, &raw)?);
        }

        if config.strategy == Strategy::Remote {
            if config.api_url.is_none() {
                return Err(ConfigError::Missing(ENV_API_URL));
            }
            if config.api_key.is_none() {
                return Err(ConfigError::Missing(ENV_API_KEY));
            }
        }

        Ok(config)
    }

    /// Progress plan with the configured cadence.
    pub fn progress_plan(&self) -> ProgressPlan {
        ProgressPlan::with_interval(self.progress_interval)
    }

    /// Builds the configured verdict source.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] when remote settings are absent and
    /// [`ConfigError::Endpoint`] when the endpoint is rejected.
    pub fn build_source(&self) -> Result<Arc<dyn VerdictSource>, ConfigError> {
        match self.strategy {
            Strategy::Simulated => Ok(Arc::new(SimulatedSource::new(self.simulated_latency))),
            Strategy::Remote => {
                let endpoint = self.api_url.clone().ok_or(ConfigError::Missing(ENV_API_URL))?;
                let api_key = self.api_key.clone().ok_or(ConfigError::Missing(ENV_API_KEY))?;
                let mut remote = RemoteConfig::new(endpoint, api_key);
                remote.timeout = self.timeout;
                remote.policy = MappingPolicy {
                    threshold: self.threshold,
                };
                let source =
                    RemoteSource::new(remote).map_err(|error| ConfigError::Endpoint(error.to_string()))?;
                Ok(Arc::new(source))
            }
        }
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is unset.
    #[error("{0} must be set for the remote strategy")]
    Missing(&'static str),
    /// Variable could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
    /// Endpoint rejected by transport policy.
    #[error("detection endpoint rejected: {0}")]
    Endpoint(String),
}
