//! HTTP detection endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use authentiscan_contract::{MappingPolicy, verdict_from_body};
use authentiscan_core::AnalysisVerdict;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::{ApiKey, DetectError, DetectionRequest, VerdictSource};

/// Header carrying the stable upload fingerprint.
pub const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`RemoteSource`].
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Detection endpoint URL.
    pub endpoint: String,
    /// Bearer credential.
    pub api_key: ApiKey,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Score threshold for flag-less responses.
    pub policy: MappingPolicy,
}

impl RemoteConfig {
    /// Creates a config with default timeout and threshold.
    pub fn new(endpoint: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
            policy: MappingPolicy::default(),
        }
    }
}

/// Posts files to a detection endpoint and maps the JSON verdict.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    endpoint: Url,
    api_key: ApiKey,
    policy: MappingPolicy,
    http_client: reqwest::Client,
}

impl RemoteSource {
    /// Creates a validated remote source.
    ///
    /// # Errors
    /// Returns [`DetectError::InvalidEndpoint`] when the endpoint fails
    /// [`validate_endpoint`], or [`DetectError::Request`] when the HTTP client
    /// cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self, DetectError> {
        let endpoint = validate_endpoint(&config.endpoint)?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| DetectError::Request(error.to_string()))?;

        Ok(Self {
            endpoint,
            api_key: config.api_key,
            policy: config.policy,
            http_client,
        })
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_form(request: &DetectionRequest) -> Form {
        let bytes = Part::bytes(request.file.bytes.clone()).file_name(request.file.name.clone());
        // An unparseable MIME string falls back to the multipart default.
        let part = match bytes.mime_str(&request.file.mime_type) {
            Ok(part) => part,
            Err(_) => Part::bytes(request.file.bytes.clone()).file_name(request.file.name.clone()),
        };

        Form::new()
            .part("file", part)
            .text("type", request.media_type.as_str())
    }
}

#[async_trait]
impl VerdictSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn resolve(&self, request: &DetectionRequest) -> Result<AnalysisVerdict, DetectError> {
        let fingerprint = request.file.fingerprint(request.media_type);

        tracing::debug!(
            endpoint = %self.endpoint,
            media_type = %request.media_type,
            size = request.file.size(),
            "posting file to detection endpoint"
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose())
            .header(IDEMPOTENCY_HEADER, fingerprint)
            .multipart(Self::build_form(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(DetectError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => return Err(DetectError::RateLimited),
            status if !status.is_success() => return Err(DetectError::Status(status.as_u16())),
            _ => {}
        }

        let body = response.text().await.map_err(transport_error)?;
        let verdict = verdict_from_body(&body, &self.policy)?;

        tracing::info!(
            is_ai = verdict.is_ai_generated,
            confidence = verdict.confidence_percent,
            factors = verdict.factors.len(),
            "detection endpoint returned verdict"
        );

        Ok(verdict)
    }
}

fn transport_error(error: reqwest::Error) -> DetectError {
    if error.is_timeout() {
        DetectError::Timeout
    } else if error.is_connect() {
        DetectError::Connect(error.to_string())
    } else if error.is_decode() || error.is_body() {
        DetectError::Malformed(error.to_string())
    } else {
        DetectError::Request(error.to_string())
    }
}

/// Validates the detection endpoint transport policy.
///
/// HTTPS is required, except for loopback hosts used in local development.
///
/// # Errors
/// Returns [`DetectError::InvalidEndpoint`] for unparsable URLs, plain HTTP to
/// non-loopback hosts, or other schemes.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, DetectError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| DetectError::InvalidEndpoint(format!("invalid endpoint url: {error}")))?;

    match parsed.scheme() {
        "https" => Ok(parsed),
        "http" if is_loopback(&parsed) => Ok(parsed),
        "http" => Err(DetectError::InvalidEndpoint(
            "detection endpoint must use https".to_string(),
        )),
        other => Err(DetectError::InvalidEndpoint(format!(
            "unsupported endpoint scheme {other}"
        ))),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(address)) => address.is_loopback(),
        Some(url::Host::Ipv6(address)) => address.is_loopback(),
        None => false,
    }
}
