//! In-memory scripture service for tests and demos.
//!
//! By default unknown verse ids are answered with a generated verse and any
//! search returns up to ten generated results, so client logic can be tested
//! without seeding data. [`MockScriptureApi::strict`] turns unknown ids into
//! 404s instead.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{catalog, Bible, Book, Chapter, ScriptureApi, Verse};
use crate::error::Result;
use crate::reference::CanonicalVerseId;
use crate::EnrichmentError;

const MAX_GENERATED_RESULTS: u32 = 10;

#[derive(Debug, Default)]
pub struct MockScriptureApi {
    /// Insertion order is the search result order.
    verses: Vec<Verse>,
    books: Vec<Book>,
    chapters: Vec<Chapter>,
    failing_translations: HashSet<String>,
    fail_all: bool,
    strict: bool,
    calls: AtomicUsize,
    searches: Mutex<Vec<(String, u32)>>,
}

impl MockScriptureApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this verse for its id in every translation. Replaces an
    /// earlier verse with the same id.
    pub fn with_verse(mut self, verse: Verse) -> Self {
        match self.verses.iter_mut().find(|v| v.id == verse.id) {
            Some(existing) => *existing = verse,
            None => self.verses.push(verse),
        }
        self
    }

    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }

    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }

    /// Unknown verse ids answer 404 instead of a generated verse.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Every call fails with a 503.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Verse lookups in this translation fail with a 503.
    pub fn failing_translation(mut self, translation_id: &str) -> Self {
        self.failing_translations.insert(translation_id.to_string());
        self
    }

    /// Number of calls made through the trait so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(query, limit)` of every search so far, in order.
    pub fn searches(&self) -> Vec<(String, u32)> {
        self.searches
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn record(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(unavailable());
        }
        Ok(())
    }
}

fn unavailable() -> EnrichmentError {
    EnrichmentError::Http {
        status: 503,
        body: "mock unavailable".to_string(),
    }
}

#[async_trait]
impl ScriptureApi for MockScriptureApi {
    async fn bibles(&self) -> Result<Vec<Bible>> {
        self.record()?;
        Ok(catalog::translations()
            .into_iter()
            .map(|t| Bible {
                id: t.id,
                name: t.name,
                abbreviation: t.abbreviation,
                description: None,
            })
            .collect())
    }

    async fn books(&self, _bible_id: &str) -> Result<Vec<Book>> {
        self.record()?;
        Ok(self.books.clone())
    }

    async fn chapters(&self, _bible_id: &str, book_id: &str) -> Result<Vec<Chapter>> {
        self.record()?;
        let prefix = format!("{}.", book_id);
        Ok(self
            .chapters
            .iter()
            .filter(|c| c.id.starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn verse(&self, bible_id: &str, verse_id: &CanonicalVerseId) -> Result<Verse> {
        self.record()?;
        if self.failing_translations.contains(bible_id) {
            return Err(unavailable());
        }
        match self.verses.iter().find(|v| v.id == verse_id.as_str()) {
            Some(verse) => Ok(verse.clone()),
            None if self.strict => Err(EnrichmentError::Http {
                status: 404,
                body: format!("verse {} not found", verse_id),
            }),
            None => Ok(Verse {
                id: verse_id.as_str().to_string(),
                reference: verse_id.as_str().to_string(),
                text: format!("Text of {}", verse_id),
                translation_id: bible_id.to_string(),
            }),
        }
    }

    async fn search(&self, bible_id: &str, query: &str, limit: u32) -> Result<Vec<Verse>> {
        self.record()?;
        if let Ok(mut log) = self.searches.lock() {
            log.push((query.to_string(), limit));
        }

        let needle = query.to_lowercase();
        let mut matches: Vec<Verse> = self
            .verses
            .iter()
            .filter(|v| v.text.to_lowercase().contains(&needle))
            .take(limit as usize)
            .cloned()
            .collect();
        if matches.is_empty() && !self.strict {
            matches = (1..=limit.min(MAX_GENERATED_RESULTS))
                .map(|n| Verse {
                    id: format!("GEN.{}.{}", n, n),
                    reference: format!("Search {} {}", query, n),
                    text: format!("Verse {} about {}", n, query),
                    translation_id: bible_id.to_string(),
                })
                .collect();
        }
        Ok(matches)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_verse_for_unknown_id() {
        let api = MockScriptureApi::new();
        let verse = api.verse("kjv", &CanonicalVerseId::new("PSA.23.1")).await.unwrap();
        assert_eq!(verse.id, "PSA.23.1");
        assert_eq!(verse.translation_id, "kjv");
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_strict_unknown_id_is_404() {
        let api = MockScriptureApi::new().strict();
        let err = api.verse("kjv", &CanonicalVerseId::new("PSA.23.1")).await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_search_caps_generated_results() {
        let api = MockScriptureApi::new();
        assert_eq!(api.search("kjv", "hope", 50).await.unwrap().len(), 10);
        assert_eq!(api.search("kjv", "hope", 2).await.unwrap().len(), 2);
        assert_eq!(api.searches().len(), 2);
    }

    #[tokio::test]
    async fn test_search_returns_seeded_verses_in_order() {
        let verse = |id: &str, text: &str| Verse {
            id: id.into(),
            reference: id.into(),
            text: text.into(),
            translation_id: "kjv".into(),
        };
        let api = MockScriptureApi::new()
            .with_verse(verse("PSA.23.4", "I will fear no evil"))
            .with_verse(verse("ISA.41.10", "Fear thou not"))
            .with_verse(verse("JHN.3.16", "For God so loved the world"))
            .with_verse(verse("PRO.1.7", "The fear of the LORD"));

        let ids: Vec<String> = api
            .search("kjv", "fear", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec!["PSA.23.4", "ISA.41.10", "PRO.1.7"]);

        let limited = api.search("kjv", "fear", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].id, "ISA.41.10");
    }

    #[tokio::test]
    async fn test_chapters_filtered_by_book() {
        let chapter = |id: &str, number: &str| Chapter {
            id: id.into(),
            number: number.into(),
            reference: String::new(),
        };
        let api = MockScriptureApi::new().with_chapters(vec![
            chapter("JHN.1", "1"),
            chapter("JHN.2", "2"),
            chapter("GEN.1", "1"),
        ]);
        assert_eq!(api.chapters("kjv", "JHN").await.unwrap().len(), 2);
    }
}
