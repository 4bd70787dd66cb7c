//! Scripture content access.
//!
//! [`ScriptureApi`] is the transport seam to the remote content service.
//! [`ScriptureClient`] wraps it with the retry executor and makes every
//! operation total: failures are logged and come back as `None` or an empty
//! list, never as an error.
//!
//! ```text
//! ScriptureClient ──► retry::execute ──► ScriptureApi
//!                                            │
//!                               ┌────────────┴────────────┐
//!                        HttpScriptureApi          MockScriptureApi
//!                   GET /bibles/{id}/verses/...    in-memory verses
//! ```

pub mod catalog;
pub mod http;
pub mod mock;

pub use http::HttpScriptureApi;
pub use mock::MockScriptureApi;

use crate::error::Result;
use crate::random::{RandomSource, ThreadRandom};
use crate::reference::{self, CanonicalVerseId};
use crate::retry::{self, RetryPolicy};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// A verse or verse range with plain-text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    /// Canonical id, e.g. `JHN.3.16`.
    pub id: String,
    /// Human-readable reference, e.g. `John 3:16`.
    pub reference: String,
    pub text: String,
    /// Id of the translation the text comes from.
    pub translation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleTranslation {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
}

/// One reference rendered in one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedVerse {
    pub verse: String,
    pub reference: String,
    pub translation: String,
}

/// A translation listed by the content service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bible {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub number: String,
    #[serde(default)]
    pub reference: String,
}

/// Abstraction over the scripture content service.
///
/// Errors are returned as-is; retry and degradation happen in
/// [`ScriptureClient`].
#[async_trait]
pub trait ScriptureApi: Send + Sync {
    /// `GET /bibles`
    async fn bibles(&self) -> Result<Vec<Bible>>;

    /// `GET /bibles/{id}/books`
    async fn books(&self, bible_id: &str) -> Result<Vec<Book>>;

    /// `GET /bibles/{id}/books/{bookId}/chapters`
    async fn chapters(&self, bible_id: &str, book_id: &str) -> Result<Vec<Chapter>>;

    /// `GET /bibles/{id}/verses/{verseId}`, plain text only.
    async fn verse(&self, bible_id: &str, verse_id: &CanonicalVerseId) -> Result<Verse>;

    /// `GET /bibles/{id}/search?query&limit`
    async fn search(&self, bible_id: &str, query: &str, limit: u32) -> Result<Vec<Verse>>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Total, retrying client over a [`ScriptureApi`].
#[derive(Clone)]
pub struct ScriptureClient {
    api: Arc<dyn ScriptureApi>,
    policy: RetryPolicy,
    random: Arc<dyn RandomSource>,
    default_translation: String,
}

impl std::fmt::Debug for ScriptureClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptureClient")
            .field("api", &self.api.name())
            .field("policy", &self.policy)
            .field("default_translation", &self.default_translation)
            .finish()
    }
}

impl ScriptureClient {
    pub fn new(api: Arc<dyn ScriptureApi>) -> Self {
        Self {
            api,
            policy: RetryPolicy::default(),
            random: Arc::new(ThreadRandom),
            default_translation: catalog::DEFAULT_TRANSLATION_ID.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the random source used for verse-of-the-day and keyword picks.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Translation used by [`is_valid_reference`](Self::is_valid_reference).
    pub fn with_default_translation(mut self, translation_id: impl Into<String>) -> Self {
        self.default_translation = translation_id.into();
        self
    }

    pub fn default_translation(&self) -> &str {
        &self.default_translation
    }

    /// Run `operation` under the retry policy; log and drop the final error.
    async fn attempt<T, F, Fut>(&self, label: &str, operation: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match retry::execute(&self.policy, label, operation).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    operation = label,
                    api = self.api.name(),
                    error = %e,
                    "scripture request failed"
                );
                None
            }
        }
    }

    /// Fetch one verse or range by canonical id.
    pub async fn get_verse(
        &self,
        translation_id: &str,
        verse_id: &CanonicalVerseId,
    ) -> Option<Verse> {
        let api = self.api.as_ref();
        self.attempt("get_verse", move || api.verse(translation_id, verse_id))
            .await
    }

    /// Resolve a reference like `"Psalm 23:1-3"` and fetch it.
    ///
    /// `None` when the text is not a reference or the lookup fails.
    pub async fn get_verse_by_reference(
        &self,
        text: &str,
        translation_id: &str,
    ) -> Option<Verse> {
        let parsed = reference::parse(text)?;
        let id = reference::to_canonical_id(&parsed);
        self.get_verse(translation_id, &id).await
    }

    /// Free-text search. `limit` is passed through unchecked.
    pub async fn search_verses(
        &self,
        query: &str,
        translation_id: &str,
        limit: u32,
    ) -> Vec<Verse> {
        let api = self.api.as_ref();
        self.attempt("search_verses", move || api.search(translation_id, query, limit))
            .await
            .unwrap_or_default()
    }

    /// A random verse from a fixed list of well-known passages.
    pub async fn get_verse_of_the_day(&self, translation_id: &str) -> Option<Verse> {
        let ids = catalog::VERSE_OF_THE_DAY;
        let id = CanonicalVerseId::new(ids[self.random.pick(ids.len())]);
        self.get_verse(translation_id, &id).await
    }

    /// Search with one randomly chosen keyword for the category.
    ///
    /// Unknown categories use the `other` keyword list.
    pub async fn get_verses_by_category(
        &self,
        category: &str,
        translation_id: &str,
        limit: u32,
    ) -> Vec<Verse> {
        let keywords = catalog::category_keywords(category);
        if keywords.is_empty() {
            return Vec::new();
        }
        let keyword = keywords[self.random.pick(keywords.len())];
        tracing::debug!(category, keyword, "searching verses by category");
        self.search_verses(keyword, translation_id, limit).await
    }

    /// The same reference in several translations, fetched one after another.
    ///
    /// Translations that fail or are unknown are left out of the result.
    pub async fn get_multiple_translations(
        &self,
        text: &str,
        abbreviations: &[&str],
    ) -> Vec<TranslatedVerse> {
        let Some(parsed) = reference::parse(text) else {
            return Vec::new();
        };
        let id = reference::to_canonical_id(&parsed);

        let mut results = Vec::with_capacity(abbreviations.len());
        for abbreviation in abbreviations {
            let Some(translation_id) = catalog::translation_id(abbreviation) else {
                tracing::warn!(abbreviation, "unknown translation, skipping");
                continue;
            };
            if let Some(verse) = self.get_verse(translation_id, &id).await {
                results.push(TranslatedVerse {
                    verse: verse.text,
                    reference: verse.reference,
                    translation: abbreviation.to_uppercase(),
                });
            }
        }
        results
    }

    /// The translations offered to users. No I/O.
    pub fn get_bible_translations(&self) -> Vec<BibleTranslation> {
        catalog::translations()
    }

    /// `true` iff `text` parses and the verse exists in the default translation.
    pub async fn is_valid_reference(&self, text: &str) -> bool {
        self.get_verse_by_reference(text, &self.default_translation)
            .await
            .is_some_and(|v| !v.text.trim().is_empty())
    }

    /// Every translation the service offers.
    pub async fn get_bibles(&self) -> Vec<Bible> {
        let api = self.api.as_ref();
        self.attempt("get_bibles", move || api.bibles())
            .await
            .unwrap_or_default()
    }

    pub async fn get_books(&self, translation_id: &str) -> Vec<Book> {
        let api = self.api.as_ref();
        self.attempt("get_books", move || api.books(translation_id))
            .await
            .unwrap_or_default()
    }

    pub async fn get_chapters(&self, translation_id: &str, book_id: &str) -> Vec<Chapter> {
        let api = self.api.as_ref();
        self.attempt("get_chapters", move || api.chapters(translation_id, book_id))
            .await
            .unwrap_or_default()
    }

    /// Category searches for several categories at once, merged in
    /// category order. Waits for every branch.
    pub async fn get_random_verses(
        &self,
        categories: &[&str],
        translation_id: &str,
        per_category: u32,
    ) -> Vec<Verse> {
        let branches = categories
            .iter()
            .map(|category| self.get_verses_by_category(category, translation_id, per_category));
        join_all(branches).await.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;

    fn john_3_16() -> Verse {
        Verse {
            id: "JHN.3.16".into(),
            reference: "John 3:16".into(),
            text: "For God so loved the world".into(),
            translation_id: catalog::DEFAULT_TRANSLATION_ID.into(),
        }
    }

    fn client(api: &Arc<MockScriptureApi>) -> ScriptureClient {
        ScriptureClient::new(api.clone())
            .with_policy(RetryPolicy::once())
            .with_random(Arc::new(FixedRandom(0)))
    }

    #[tokio::test]
    async fn test_get_verse_by_reference() {
        let api = Arc::new(MockScriptureApi::new().with_verse(john_3_16()));
        let verse = client(&api)
            .get_verse_by_reference("John 3:16", catalog::DEFAULT_TRANSLATION_ID)
            .await;
        assert_eq!(verse, Some(john_3_16()));
    }

    #[tokio::test]
    async fn test_get_verse_by_reference_unparseable_skips_io() {
        let api = Arc::new(MockScriptureApi::new().with_verse(john_3_16()));
        let verse = client(&api)
            .get_verse_by_reference("John16", catalog::DEFAULT_TRANSLATION_ID)
            .await;
        assert!(verse.is_none());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_retry_then_degrade() {
        let api = Arc::new(MockScriptureApi::new().failing());
        let client = ScriptureClient::new(api.clone());

        assert!(client.search_verses("hope", "any", 5).await.is_empty());
        assert_eq!(api.calls(), 3);
        assert!(client.get_verse("any", &CanonicalVerseId::new("JHN.3.16")).await.is_none());
        assert!(client.get_bibles().await.is_empty());
        assert!(client.get_books("any").await.is_empty());
        assert!(client.get_chapters("any", "JHN").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_limit_through() {
        let api = Arc::new(MockScriptureApi::new().with_verse(john_3_16()));
        client(&api).search_verses("loved", "any", 250).await;
        assert_eq!(api.searches(), vec![("loved".to_string(), 250)]);
    }

    #[tokio::test]
    async fn test_verse_of_the_day_uses_random_source() {
        let api = Arc::new(MockScriptureApi::new());
        let client = client(&api).with_random(Arc::new(FixedRandom(3)));
        // mock answers any id it does not know with a generated verse
        let verse = client.get_verse_of_the_day("any").await.unwrap();
        assert_eq!(verse.id, "ROM.8.28");
    }

    #[tokio::test]
    async fn test_verse_of_the_day_member_of_fixed_set() {
        let api = Arc::new(MockScriptureApi::new());
        let client = ScriptureClient::new(api.clone()).with_policy(RetryPolicy::once());
        let verse = client.get_verse_of_the_day("any").await.unwrap();
        assert!(catalog::VERSE_OF_THE_DAY.contains(&verse.id.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_category_uses_other_keywords() {
        let api = Arc::new(MockScriptureApi::new());
        let verses = client(&api)
            .get_verses_by_category("nonexistent-category", "any", 5)
            .await;
        assert!(!verses.is_empty());
        let (query, limit) = api.searches().remove(0);
        assert!(catalog::category_keywords("other").contains(&query.as_str()));
        assert_eq!(limit, 5);
    }

    #[tokio::test]
    async fn test_multiple_translations_partial() {
        let api = Arc::new(
            MockScriptureApi::new().failing_translation(catalog::translation_id("ASV").unwrap()),
        );
        let results = client(&api)
            .get_multiple_translations("John 3:16", &["KJV", "ASV", "XYZ", "web"])
            .await;

        let names: Vec<&str> = results.iter().map(|r| r.translation.as_str()).collect();
        assert_eq!(names, vec!["KJV", "WEB"]);
        assert!(results.iter().all(|r| !r.verse.is_empty()));
    }

    #[tokio::test]
    async fn test_multiple_translations_bad_reference() {
        let api = Arc::new(MockScriptureApi::new());
        assert!(client(&api)
            .get_multiple_translations("not a verse", &["KJV"])
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_is_valid_reference() {
        let api = Arc::new(MockScriptureApi::new().strict().with_verse(john_3_16()));
        let client = client(&api);
        assert!(client.is_valid_reference("John 3:16").await);
        assert!(!client.is_valid_reference("Hezekiah 4:2").await);
        assert!(!client.is_valid_reference("John16").await);
    }

    #[tokio::test]
    async fn test_get_books_and_chapters() {
        let book = |id: &str, name: &str| Book {
            id: id.into(),
            name: name.into(),
            abbreviation: String::new(),
        };
        let chapter = Chapter {
            id: "JHN.3".into(),
            number: "3".into(),
            reference: "John 3".into(),
        };
        let api = Arc::new(
            MockScriptureApi::new()
                .with_books(vec![book("GEN", "Genesis"), book("JHN", "John")])
                .with_chapters(vec![chapter.clone()]),
        );
        let client = client(&api);

        let books = client.get_books(catalog::DEFAULT_TRANSLATION_ID).await;
        let names: Vec<&str> = books.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Genesis", "John"]);

        let chapters = client.get_chapters(catalog::DEFAULT_TRANSLATION_ID, "JHN").await;
        assert_eq!(chapters, vec![chapter]);
        assert!(client.get_chapters(catalog::DEFAULT_TRANSLATION_ID, "GEN").await.is_empty());

        assert_eq!(client.get_bibles().await.len(), 5);
        assert_eq!(api.calls(), 4);
    }

    #[test]
    fn test_bible_translations_static() {
        let api = Arc::new(MockScriptureApi::new());
        let translations = client(&api).get_bible_translations();
        assert_eq!(translations.len(), 5);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_random_verses_fan_out_in_category_order() {
        let api = Arc::new(MockScriptureApi::new());
        let verses = client(&api)
            .get_random_verses(&["healing", "anxiety", "grief"], "any", 2)
            .await;

        assert_eq!(verses.len(), 6);
        let queries: Vec<String> = api.searches().into_iter().map(|(q, _)| q).collect();
        assert_eq!(queries.len(), 3);
        assert_eq!(verses[0].reference, "Search heal 1");
        assert_eq!(verses[2].reference, "Search anxious 1");
        assert_eq!(verses[4].reference, "Search comfort 1");
    }
}
