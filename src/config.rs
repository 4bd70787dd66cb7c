//! Runtime configuration for the enrichment components.
//!
//! [`EnrichmentConfig`] holds endpoints, credentials, model parameters and
//! the retry policy. It can be deserialized, assembled with
//! [`EnrichmentConfig::builder`], or read from `ENRICHMENT_*` environment
//! variables. The `build_*` methods wire components onto one shared
//! `reqwest::Client`.
//!
//! # Example
//!
//! ```
//! use scripture_enrichment::EnrichmentConfig;
//!
//! let config = EnrichmentConfig::builder()
//!     .ai_base_url("https://api.openai.com/v1/")
//!     .retry_attempts(2)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.ai_base_url, "https://api.openai.com");
//! ```

use crate::backend::OpenAiBackend;
use crate::error::Result;
use crate::generator::{CompletionSettings, EnrichmentGenerator};
use crate::retry::RetryPolicy;
use crate::scripture::{catalog, http, HttpScriptureApi, ScriptureClient};
use crate::EnrichmentError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const ENV_PREFIX: &str = "ENRICHMENT_";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Base URL of the OpenAI-compatible completion service.
    pub ai_base_url: String,
    pub ai_api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub study_guide_max_tokens: u32,
    pub temperature: f64,
    /// Base URL of the scripture content service, including its version path.
    pub scripture_base_url: String,
    pub scripture_api_key: Option<String>,
    /// Translation id used for reference validation.
    pub default_translation: String,
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
    /// Per-request timeout, applied to the HTTP client and to each attempt.
    pub request_timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        let settings = CompletionSettings::default();
        let policy = RetryPolicy::default();
        Self {
            ai_base_url: "https://api.openai.com".to_string(),
            ai_api_key: None,
            model: settings.model,
            max_tokens: settings.max_tokens,
            study_guide_max_tokens: settings.study_guide_max_tokens,
            temperature: settings.temperature,
            scripture_base_url: http::DEFAULT_BASE_URL.to_string(),
            scripture_api_key: None,
            default_translation: catalog::DEFAULT_TRANSLATION_ID.to_string(),
            retry_attempts: policy.max_attempts(),
            retry_base_delay_ms: policy.base_delay().as_millis() as u64,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for EnrichmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_deref().map(crate::backend::openai::redact);
        f.debug_struct("EnrichmentConfig")
            .field("ai_base_url", &self.ai_base_url)
            .field("ai_api_key", &redact(&self.ai_api_key))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("study_guide_max_tokens", &self.study_guide_max_tokens)
            .field("temperature", &self.temperature)
            .field("scripture_base_url", &self.scripture_base_url)
            .field("scripture_api_key", &redact(&self.scripture_api_key))
            .field("default_translation", &self.default_translation)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl EnrichmentConfig {
    pub fn builder() -> EnrichmentConfigBuilder {
        EnrichmentConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read `ENRICHMENT_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Build a config from `(name, value)` pairs.
    ///
    /// Names without the `ENRICHMENT_` prefix and unknown names are ignored;
    /// unset fields keep their defaults. A value that fails to parse is an
    /// [`EnrichmentError::InvalidConfig`].
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (name, value) in vars {
            let Some(key) = name.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value: String = value.into();
            match key {
                "AI_BASE_URL" => config.ai_base_url = value,
                "AI_API_KEY" => config.ai_api_key = non_blank(value),
                "MODEL" => config.model = value,
                "MAX_TOKENS" => config.max_tokens = parse_var(key, &value)?,
                "STUDY_GUIDE_MAX_TOKENS" => config.study_guide_max_tokens = parse_var(key, &value)?,
                "TEMPERATURE" => config.temperature = parse_var(key, &value)?,
                "SCRIPTURE_BASE_URL" => config.scripture_base_url = value,
                "SCRIPTURE_API_KEY" => config.scripture_api_key = non_blank(value),
                "DEFAULT_TRANSLATION" => config.default_translation = value,
                "RETRY_ATTEMPTS" => config.retry_attempts = parse_var(key, &value)?,
                "RETRY_DELAY_MS" => config.retry_base_delay_ms = parse_var(key, &value)?,
                "TIMEOUT_SECS" => config.request_timeout_secs = parse_var(key, &value)?,
                other => tracing::debug!(variable = other, "ignoring unknown setting"),
            }
        }
        config.validated()
    }

    /// Normalize URLs and reject values no component can run with.
    fn validated(mut self) -> Result<Self> {
        self.ai_base_url = normalize_base_url(&self.ai_base_url);
        self.scripture_base_url = self.scripture_base_url.trim().trim_end_matches('/').to_string();

        if self.ai_base_url.is_empty() {
            return Err(EnrichmentError::InvalidConfig("AI base URL is empty".into()));
        }
        if self.scripture_base_url.is_empty() {
            return Err(EnrichmentError::InvalidConfig("scripture base URL is empty".into()));
        }
        if self.retry_attempts == 0 {
            return Err(EnrichmentError::InvalidConfig(
                "retry attempts must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(EnrichmentError::InvalidConfig(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(EnrichmentError::InvalidConfig("request timeout must be positive".into()));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts.max(1),
            Duration::from_millis(self.retry_base_delay_ms),
        )
        .with_attempt_timeout(self.request_timeout())
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            study_guide_max_tokens: self.study_guide_max_tokens,
            temperature: self.temperature,
        }
    }

    /// A pooled client with the configured timeout, to pass to both builders.
    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.request_timeout())
            .build()
            .map_err(|e| EnrichmentError::InvalidConfig(format!("HTTP client: {}", e)))
    }

    pub fn build_generator(&self, client: &Client) -> EnrichmentGenerator {
        let mut backend = OpenAiBackend::new(client.clone(), self.ai_base_url.clone());
        if let Some(key) = &self.ai_api_key {
            backend = backend.with_api_key(key.clone());
        }
        tracing::info!(
            base_url = %self.ai_base_url,
            model = %self.model,
            authenticated = backend.has_api_key(),
            "enrichment generator configured"
        );
        EnrichmentGenerator::new(Arc::new(backend))
            .with_policy(self.retry_policy())
            .with_settings(self.completion_settings())
    }

    /// Fails when no scripture API key is configured.
    pub fn build_scripture_client(&self, client: &Client) -> Result<ScriptureClient> {
        let key = self.scripture_api_key.clone().ok_or_else(|| {
            EnrichmentError::InvalidConfig("scripture API key is not set".into())
        })?;
        let api = HttpScriptureApi::new(client.clone(), self.scripture_base_url.clone(), key);
        tracing::info!(base_url = %self.scripture_base_url, "scripture client configured");
        Ok(ScriptureClient::new(Arc::new(api))
            .with_policy(self.retry_policy())
            .with_default_translation(self.default_translation.clone()))
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        EnrichmentError::InvalidConfig(format!("{}{}={:?}: {}", ENV_PREFIX, key, value, e))
    })
}

/// Strip the completion path suffixes the backend appends itself.
/// e.g. "https://api.openai.com/v1" -> "https://api.openai.com"
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    // longest first
    for suffix in &["/v1/chat/completions", "/v1/chat", "/v1"] {
        if let Some(stripped) = trimmed.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}

/// Builder for [`EnrichmentConfig`]. Starts from the defaults.
#[derive(Debug, Clone)]
pub struct EnrichmentConfigBuilder {
    config: EnrichmentConfig,
}

impl EnrichmentConfigBuilder {
    pub fn ai_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.ai_base_url = url.into();
        self
    }

    pub fn ai_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.ai_api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    pub fn study_guide_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.study_guide_max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn scripture_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.scripture_base_url = url.into();
        self
    }

    pub fn scripture_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.scripture_api_key = Some(key.into());
        self
    }

    pub fn default_translation(mut self, translation_id: impl Into<String>) -> Self {
        self.config.default_translation = translation_id.into();
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.config.retry_attempts = attempts;
        self
    }

    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.config.retry_base_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the request timeout. Default: 30 seconds. Whole seconds only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn build(self) -> Result<EnrichmentConfig> {
        self.config.validated()
    }
}
