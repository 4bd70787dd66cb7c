//! HTTP transport for the scripture content service.
//!
//! Every response is wrapped as `{"data": ...}`. Verse content is requested as
//! plain text without notes, titles or verse numbers.

use super::{Bible, Book, Chapter, ScriptureApi, Verse};
use crate::error::Result;
use crate::reference::CanonicalVerseId;
use crate::EnrichmentError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.scripture.api.bible/v1";

const VERSE_QUERY: [(&str, &str); 4] = [
    ("include-notes", "false"),
    ("include-titles", "false"),
    ("include-verse-numbers", "false"),
    ("content-type", "text"),
];

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVerse {
    id: String,
    #[serde(default)]
    bible_id: String,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSearchVerse {
    id: String,
    #[serde(default)]
    bible_id: String,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct WireSearch {
    #[serde(default)]
    verses: Vec<WireSearchVerse>,
}

impl From<WireVerse> for Verse {
    fn from(w: WireVerse) -> Self {
        Verse {
            id: w.id,
            reference: w.reference,
            text: w.content.trim().to_string(),
            translation_id: w.bible_id,
        }
    }
}

impl From<WireSearchVerse> for Verse {
    fn from(w: WireSearchVerse) -> Self {
        Verse {
            id: w.id,
            reference: w.reference,
            text: w.text.trim().to_string(),
            translation_id: w.bible_id,
        }
    }
}

/// Unwrap the `data` field of a success body.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    Ok(envelope.data)
}

/// [`ScriptureApi`] over HTTP, sending the key as the `api-key` header.
#[derive(Clone)]
pub struct HttpScriptureApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpScriptureApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpScriptureApi")
            .field("base_url", &self.base_url)
            .field("api_key", &crate::backend::openai::redact(&self.api_key))
            .finish()
    }
}

impl HttpScriptureApi {
    /// Create a transport sharing `client` (and its connection pool).
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "scripture request");

        let resp = self
            .client
            .get(&url)
            .header("api-key", &self.api_key)
            .query(query)
            .send()
            .await?;
        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EnrichmentError::Http { status, body });
        }

        decode(&resp.text().await?)
    }
}

#[async_trait]
impl ScriptureApi for HttpScriptureApi {
    async fn bibles(&self) -> Result<Vec<Bible>> {
        self.get("/bibles", &[]).await
    }

    async fn books(&self, bible_id: &str) -> Result<Vec<Book>> {
        self.get(&format!("/bibles/{}/books", bible_id), &[]).await
    }

    async fn chapters(&self, bible_id: &str, book_id: &str) -> Result<Vec<Chapter>> {
        self.get(&format!("/bibles/{}/books/{}/chapters", bible_id, book_id), &[])
            .await
    }

    async fn verse(&self, bible_id: &str, verse_id: &CanonicalVerseId) -> Result<Verse> {
        let wire: WireVerse = self
            .get(&format!("/bibles/{}/verses/{}", bible_id, verse_id), &VERSE_QUERY)
            .await?;
        Ok(wire.into())
    }

    async fn search(&self, bible_id: &str, query: &str, limit: u32) -> Result<Vec<Verse>> {
        let limit = limit.to_string();
        let wire: WireSearch = self
            .get(
                &format!("/bibles/{}/search", bible_id),
                &[("query", query), ("limit", limit.as_str())],
            )
            .await?;
        Ok(wire.verses.into_iter().map(Verse::from).collect())
    }

    fn name(&self) -> &'static str {
        "api.bible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verse_envelope() {
        let body = json!({"data": {
            "id": "JHN.3.16",
            "orgId": "JHN.3.16",
            "bibleId": "de4e12af7f28f599-02",
            "reference": "John 3:16",
            "content": "     For God so loved the world\n"
        }});
        let env: Envelope<WireVerse> = serde_json::from_value(body).unwrap();
        let verse = Verse::from(env.data);
        assert_eq!(verse.text, "For God so loved the world");
        assert_eq!(verse.translation_id, "de4e12af7f28f599-02");
    }

    #[test]
    fn test_search_without_verses() {
        let body = json!({"data": {"query": "zzz", "total": 0}});
        let env: Envelope<WireSearch> = serde_json::from_value(body).unwrap();
        assert!(env.data.verses.is_empty());
    }

    #[test]
    fn test_bibles_envelope() {
        let body = json!({"data": [
            {"id": "de4e12af7f28f599-02", "name": "King James (Authorised) Version", "abbreviation": "engKJV", "description": "Protestant"},
            {"id": "9879dbb7cfe39e4d-04", "name": "World English Bible"}
        ]});
        let env: Envelope<Vec<Bible>> = serde_json::from_value(body).unwrap();
        assert_eq!(env.data.len(), 2);
        assert_eq!(env.data[1].abbreviation, "");
    }

    #[test]
    fn test_decode_rejects_missing_envelope() {
        let ok: Vec<Book> = decode(r#"{"data": [{"id": "GEN", "name": "Genesis"}]}"#).unwrap();
        assert_eq!(ok[0].id, "GEN");

        let err = decode::<Vec<Book>>(r#"[{"id": "GEN", "name": "Genesis"}]"#).unwrap_err();
        assert!(matches!(err, EnrichmentError::Json(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = HttpScriptureApi::new(Client::new(), "https://example.test/v1/", "key");
        assert_eq!(api.url("/bibles"), "https://example.test/v1/bibles");
    }

    #[test]
    fn test_debug_redacts_key() {
        let api = HttpScriptureApi::new(Client::new(), DEFAULT_BASE_URL, "0123456789abcdef");
        let debug = format!("{:?}", api);
        assert!(!debug.contains("0123456789abcdef"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let api = HttpScriptureApi::new(Client::new(), "http://127.0.0.1:9", "key");
        let err = api.bibles().await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Request(_)));
    }
}
