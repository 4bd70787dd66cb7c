//! # Scripture Enrichment
//!
//! Resilient content enrichment for prayer requests: verse suggestions,
//! topical tags and study guides from an AI completion service, plus
//! lookups against a scripture content service.
//!
//! Every outward call runs through the [`retry`] executor. Nothing in the
//! generation or content paths fails outright: AI output that does not
//! validate falls back to the curated [`FallbackLibrary`], and scripture
//! lookups degrade to `None` or an empty list.
//!
//! ## Core Concepts
//!
//! - **[`RetryPolicy`]** and [`retry::execute`]: bounded attempts with linear
//!   backoff and optional per-attempt timeouts.
//! - **[`reference`]**: parses `"Book C:V[-E]"` and maps it to canonical ids
//!   such as `JHN.3.16`.
//! - **[`ScriptureClient`]**: total operations over a [`ScriptureApi`]
//!   (HTTP or mock).
//! - **[`EnrichmentGenerator`]**: AI suggestions over a
//!   [`CompletionBackend`](backend::CompletionBackend), strictly validated.
//! - **[`EnrichmentConfig`]**: wiring from code, serde or `ENRICHMENT_*`
//!   environment variables.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scripture_enrichment::{EnrichmentConfig, Prayer, Urgency};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     scripture_enrichment::logging::init_logging("info");
//!
//!     let config = EnrichmentConfig::from_env()?;
//!     let client = config.http_client()?;
//!     let generator = config.build_generator(&client);
//!     let scripture = config.build_scripture_client(&client)?;
//!
//!     let prayer = Prayer::new("Surgery", "Please pray for my recovery", "healing")
//!         .with_urgency(Urgency::High);
//!     let analysis = generator.analyze(&prayer).await?;
//!     for verse in &analysis.verses {
//!         println!("{} ({:.1})", verse.reference, verse.relevance_score);
//!     }
//!
//!     if let Some(verse) = scripture.get_verse_of_the_day(scripture.default_translation()).await {
//!         println!("{}: {}", verse.reference, verse.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod logging;
pub mod model;
pub mod parsing;
pub mod prompt;
pub mod random;
pub mod reference;
pub mod retry;
pub mod scripture;
pub mod validate;

pub use backend::{CompletionBackend, MockBackend, OpenAiBackend};
pub use config::{EnrichmentConfig, EnrichmentConfigBuilder};
pub use error::{EnrichmentError, Result, ValidationFailure};
pub use fallback::FallbackLibrary;
pub use generator::{CompletionSettings, EnrichmentGenerator};
pub use model::{
    Difficulty, Prayer, PrayerAnalysis, StudyGuide, TagSet, Urgency, VerseSuggestion,
};
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use reference::{CanonicalVerseId, ScriptureReference};
pub use retry::RetryPolicy;
pub use scripture::{
    BibleTranslation, HttpScriptureApi, MockScriptureApi, ScriptureApi, ScriptureClient,
    TranslatedVerse, Verse,
};
