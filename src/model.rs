//! Value types flowing through the enrichment pipeline.
//!
//! Everything here is request-scoped. Field names serialize as camelCase,
//! which is the shape downstream JSON consumers expect.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds applied to every [`VerseSuggestion::relevance_score`].
pub const MIN_RELEVANCE: f64 = 0.1;
pub const MAX_RELEVANCE: f64 = 1.0;

/// Upper bound on the number of tags attached to a prayer.
pub const MAX_TAGS: usize = 8;

/// How pressing a prayer request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's prayer submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub urgency: Urgency,
}

impl Prayer {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            urgency: Urgency::default(),
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }
}

/// A scripture passage suggested for a prayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseSuggestion {
    pub text: String,
    pub reference: String,
    pub explanation: String,
    pub relevance_score: f64,
    pub ai_generated: bool,
    pub translation: String,
}

/// Clamp a model-supplied score into `[MIN_RELEVANCE, MAX_RELEVANCE]`.
///
/// NaN maps to the lower bound.
pub fn clamp_relevance(score: f64) -> f64 {
    if score.is_nan() {
        return MIN_RELEVANCE;
    }
    score.clamp(MIN_RELEVANCE, MAX_RELEVANCE)
}

/// Ordered, normalised tags. Never longer than [`MAX_TAGS`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Normalise raw tags: trim, lowercase, drop inner whitespace, drop
    /// empties, keep the first [`MAX_TAGS`].
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = raw
            .into_iter()
            .map(|t| {
                t.as_ref()
                    .trim()
                    .to_lowercase()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty())
            .take(MAX_TAGS)
            .collect();
        Self(tags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// A verse quoted inside a study guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideVerse {
    pub text: String,
    pub reference: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub content: String,
    pub verses: Vec<GuideVerse>,
    pub questions: Vec<SectionQuestion>,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerPrompt {
    pub prompt: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionQuestion {
    pub question: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    pub step: String,
    pub description: String,
    pub order: u32,
}

/// A multi-section study guide built around a prayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGuide {
    pub title: String,
    pub description: String,
    pub estimated_duration_minutes: u32,
    pub difficulty: Difficulty,
    pub sections: Vec<Section>,
    pub key_verses: Vec<GuideVerse>,
    pub prayer_prompts: Vec<PrayerPrompt>,
    pub reflection_questions: Vec<ReflectionQuestion>,
    pub action_steps: Vec<ActionStep>,
    pub tags: Vec<String>,
}

/// Result of [`EnrichmentGenerator::analyze`](crate::generator::EnrichmentGenerator::analyze).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerAnalysis {
    pub verses: Vec<VerseSuggestion>,
    pub tags: TagSet,
}
