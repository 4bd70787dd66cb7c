use std::time::Duration;
use thiserror::Error;

use crate::retry::AttemptTimeout;

/// Errors produced by the enrichment pipeline and its components.
///
/// Public generation and content methods never return these; they are
/// absorbed into fallbacks. They surface from the transport seams
/// ([`CompletionBackend`](crate::backend::CompletionBackend),
/// [`ScriptureApi`](crate::scripture::ScriptureApi)), from
/// [`retry::execute`](crate::retry::execute) and from
/// [`EnrichmentGenerator::analyze`](crate::generator::EnrichmentGenerator::analyze).
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status from an upstream service.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code (e.g. 404, 429, 503).
        status: u16,
        /// Response body text.
        body: String,
    },

    /// A single attempt exceeded the policy's per-attempt timeout.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The model answered, but not in the requested shape.
    #[error("invalid model output: {0}")]
    Validation(#[from] ValidationFailure),

    /// The caller's own input cannot be enriched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration detected at build time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl From<AttemptTimeout> for EnrichmentError {
    fn from(err: AttemptTimeout) -> Self {
        EnrichmentError::Timeout(err.0)
    }
}

/// Why a completion payload was rejected.
///
/// Validation is all-or-nothing: one bad element rejects the whole payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The completion text was empty or whitespace-only.
    #[error("empty completion")]
    EmptyResponse,

    /// No JSON value could be located in the completion text.
    #[error("completion is not JSON: {0}")]
    NotJson(String),

    /// JSON was found but has the wrong top-level shape.
    #[error("expected {expected}, found {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A required field is missing, empty, or of the wrong type.
    #[error("element {index}: field '{field}' is missing or invalid")]
    MissingField { index: usize, field: &'static str },

    /// The payload does not deserialize into the expected structure.
    #[error("schema mismatch: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, EnrichmentError>;
