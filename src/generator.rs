//! AI-backed enrichment with strict validation and fallback.
//!
//! [`EnrichmentGenerator`] turns a prayer into verse suggestions, tags and a
//! study guide. Every call follows the same path:
//!
//! ```text
//! prompt ──► retry::execute( backend.complete ──► extract_payload ──► validate ) ──► post-process
//!                                     │ any failure after the last attempt
//!                                     └──────────────► FallbackLibrary
//! ```
//!
//! A malformed answer fails the attempt just like a transport error, so the
//! model is asked again up to the policy's attempt limit.
//!
//! # Example
//!
//! ```
//! use scripture_enrichment::backend::MockBackend;
//! use scripture_enrichment::{EnrichmentGenerator, RetryPolicy, Urgency};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let generator = EnrichmentGenerator::new(Arc::new(MockBackend::fixed("not json")))
//!     .with_policy(RetryPolicy::once());
//! let verses = generator
//!     .generate_verses("Please pray for my recovery", "healing", Urgency::High)
//!     .await;
//! assert!(!verses.is_empty());
//! assert!(verses.iter().all(|v| !v.ai_generated));
//! # });
//! ```

use crate::backend::{ChatMessage, CompletionBackend, CompletionRequest};
use crate::error::{EnrichmentError, Result, ValidationFailure};
use crate::fallback::FallbackLibrary;
use crate::model::{
    clamp_relevance, Prayer, PrayerAnalysis, StudyGuide, TagSet, Urgency, VerseSuggestion,
};
use crate::retry::{self, RetryPolicy};
use crate::{parsing, prompt, validate};
use serde_json::Value;
use std::sync::Arc;

/// Translation label stamped on AI suggestions; the prompt asks for NIV text.
pub const AI_TRANSLATION: &str = "NIV";

/// Model parameters for completion requests.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    /// Model identifier.
    pub model: String,
    /// Token limit for verse and tag requests.
    pub max_tokens: u32,
    /// Token limit for study guide requests, which are much longer.
    pub study_guide_max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            study_guide_max_tokens: 3000,
            temperature: 0.7,
        }
    }
}

/// Generates enrichment content, substituting fallbacks on any failure.
///
/// Cheap to share: hold it in an `Arc` or clone it; both the backend and
/// the fallback library are reference counted.
#[derive(Clone)]
pub struct EnrichmentGenerator {
    backend: Arc<dyn CompletionBackend>,
    fallback: Arc<FallbackLibrary>,
    policy: RetryPolicy,
    settings: CompletionSettings,
}

impl std::fmt::Debug for EnrichmentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentGenerator")
            .field("backend", &self.backend.name())
            .field("policy", &self.policy)
            .field("settings", &self.settings)
            .finish()
    }
}

impl EnrichmentGenerator {
    /// Create a generator with the standard fallbacks and default policy.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            fallback: Arc::new(FallbackLibrary::standard()),
            policy: RetryPolicy::default(),
            settings: CompletionSettings::default(),
        }
    }

    /// Share an existing fallback library.
    pub fn with_fallback(mut self, fallback: Arc<FallbackLibrary>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_settings(mut self, settings: CompletionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn fallback(&self) -> &FallbackLibrary {
        &self.fallback
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `messages` through the retry executor and validate the answer.
    async fn request_validated<T, V>(
        &self,
        label: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        validator: V,
    ) -> Result<T>
    where
        V: Fn(&Value) -> std::result::Result<T, ValidationFailure>,
    {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens,
            temperature: self.settings.temperature,
        };

        let request = &request;
        let backend = self.backend.as_ref();
        let validator = &validator;

        retry::execute(&self.policy, label, move || async move {
            let response = backend.complete(request).await?;
            let value = parsing::extract_payload(&response.text)?;
            let validated = validator(&value)?;
            Ok::<T, EnrichmentError>(validated)
        })
        .await
    }

    /// Suggest scripture for a prayer. Never fails.
    ///
    /// On success every suggestion has `ai_generated = true`, translation
    /// `NIV` and a relevance score clamped into `[0.1, 1.0]`. On any failure
    /// the category's fallback list is returned unchanged.
    pub async fn generate_verses(
        &self,
        prayer_text: &str,
        category: &str,
        urgency: Urgency,
    ) -> Vec<VerseSuggestion> {
        let messages = prompt::verse_messages(prayer_text, category, urgency);
        let result = self
            .request_validated(
                "generate_verses",
                messages,
                self.settings.max_tokens,
                validate::verse_suggestions,
            )
            .await;

        match result {
            Ok(raw) => raw
                .into_iter()
                .map(|r| VerseSuggestion {
                    text: r.verse,
                    reference: r.reference,
                    explanation: r.explanation,
                    relevance_score: clamp_relevance(r.relevance_score),
                    ai_generated: true,
                    translation: AI_TRANSLATION.to_string(),
                })
                .collect(),
            Err(e) => {
                tracing::warn!(category, error = %e, "verse generation failed, using fallback");
                self.fallback.verses_for(category)
            }
        }
    }

    /// Tag a prayer with at most 8 lowercase tags. Never fails.
    pub async fn generate_tags(&self, prayer_text: &str, category: &str) -> TagSet {
        let messages = prompt::tag_messages(prayer_text, category);
        let result = self
            .request_validated("generate_tags", messages, self.settings.max_tokens, validate::tags)
            .await;

        match result {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(category, error = %e, "tag generation failed, using fallback");
                self.fallback.tags_for(category)
            }
        }
    }

    /// Build a study guide for a prayer. Never fails, never empty.
    pub async fn generate_study_guide(
        &self,
        prayer: &Prayer,
        verses: &[VerseSuggestion],
    ) -> StudyGuide {
        let messages = prompt::study_guide_messages(prayer, verses);
        let result = self
            .request_validated(
                "generate_study_guide",
                messages,
                self.settings.study_guide_max_tokens,
                validate::study_guide,
            )
            .await;

        match result {
            Ok(guide) => guide,
            Err(e) => {
                tracing::warn!(
                    category = %prayer.category,
                    error = %e,
                    "study guide generation failed, using fallback"
                );
                self.fallback.study_guide_for(prayer)
            }
        }
    }

    /// Verses and tags for a new submission, generated concurrently.
    ///
    /// Fails only when the submission itself cannot be enriched (blank
    /// content or category). Upstream failures are absorbed as usual.
    pub async fn analyze(&self, prayer: &Prayer) -> Result<PrayerAnalysis> {
        if prayer.content.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "prayer content is empty".to_string(),
            ));
        }
        if prayer.category.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "prayer category is empty".to_string(),
            ));
        }

        let (verses, tags) = tokio::join!(
            self.generate_verses(&prayer.content, &prayer.category, prayer.urgency),
            self.generate_tags(&prayer.content, &prayer.category),
        );

        tracing::debug!(
            category = %prayer.category,
            verses = verses.len(),
            tags = tags.len(),
            "prayer analyzed"
        );
        Ok(PrayerAnalysis { verses, tags })
    }
}
