//! Backend for OpenAI-compatible chat-completion APIs.
//!
//! Endpoint: `/v1/chat/completions`. Only the non-streaming shape is used:
//! `{"choices": [{"message": {"content": "..."}}]}`.

use super::{CompletionBackend, CompletionRequest, CompletionResponse};
use crate::error::Result;
use crate::EnrichmentError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Backend for any OpenAI-compatible API.
///
/// # Example
///
/// ```
/// use scripture_enrichment::backend::OpenAiBackend;
///
/// let backend = OpenAiBackend::new(reqwest::Client::new(), "https://api.openai.com")
///     .with_api_key("sk-...");
/// assert!(backend.has_api_key());
/// ```
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    /// Optional API key. If set, sent as `Authorization: Bearer {key}`.
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|k| redact(k)))
            .finish()
    }
}

pub(crate) fn redact(key: &str) -> String {
    match key.get(..6) {
        Some(prefix) if key.len() > 6 => format!("{}***", prefix),
        _ => "***".to_string(),
    }
}

impl OpenAiBackend {
    /// Create a backend sharing `client` (and its connection pool).
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Set the API key for authentication.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Returns `true` if an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build the request body for `/v1/chat/completions`.
    fn build_body(request: &CompletionRequest) -> Value {
        json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }

    fn build_http_request(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        let mut req = self.client.post(url).json(body);
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }
        req
    }

    /// Decode a success body and return its completion text.
    fn parse_completion(body: &str) -> Result<String> {
        let json_resp: Value = serde_json::from_str(body)?;
        Self::extract_content(&json_resp)
            .map(str::to_string)
            .ok_or_else(|| {
                EnrichmentError::Other(
                    "completion response has no choices[0].message.content".into(),
                )
            })
    }

    /// Pull `choices[0].message.content` out of a response body.
    fn extract_content(json_resp: &Value) -> Option<&str> {
        json_resp
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = self.endpoint();
        let body = Self::build_body(request);

        tracing::debug!(model = %request.model, url = %url, "sending completion request");

        let resp = self.build_http_request(&url, &body).send().await?;
        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(EnrichmentError::Http { status, body: text });
        }

        let text = Self::parse_completion(&resp.text().await?)?;
        Ok(CompletionResponse { text, status })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ChatMessage;

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![
                ChatMessage::system("You are a helpful assistant."),
                ChatMessage::user("Suggest a verse."),
            ],
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    #[test]
    fn test_chat_payload() {
        let body = OpenAiBackend::build_body(&test_request());

        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 1000);

        let messages = body["messages"].as_array().expect("messages");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are a helpful assistant.");
        assert_eq!(messages[1]["role"], "user");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_extract_content() {
        let resp = json!({"choices": [{"message": {"role": "assistant", "content": "[1]"}}]});
        assert_eq!(OpenAiBackend::extract_content(&resp), Some("[1]"));

        let empty = json!({"choices": []});
        assert_eq!(OpenAiBackend::extract_content(&empty), None);
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices": [{"message": {"content": "[\"hope\"]"}}]}"#;
        assert_eq!(OpenAiBackend::parse_completion(body).unwrap(), r#"["hope"]"#);

        assert!(matches!(
            OpenAiBackend::parse_completion("<html>Bad Gateway</html>"),
            Err(EnrichmentError::Json(_))
        ));
        assert!(matches!(
            OpenAiBackend::parse_completion(r#"{"choices": []}"#),
            Err(EnrichmentError::Other(_))
        ));
    }

    #[test]
    fn test_auth_header() {
        let backend = OpenAiBackend::new(Client::new(), "https://api.openai.com/")
            .with_api_key("sk-test123");
        let body = json!({"test": true});
        let req = backend
            .build_http_request(&backend.endpoint(), &body)
            .build()
            .expect("build request");

        assert_eq!(req.url().as_str(), "https://api.openai.com/v1/chat/completions");
        let auth = req.headers().get("Authorization").expect("auth header");
        assert_eq!(auth, "Bearer sk-test123");
    }

    #[test]
    fn test_no_auth() {
        let backend = OpenAiBackend::new(Client::new(), "https://api.openai.com");
        let req = backend
            .build_http_request(&backend.endpoint(), &json!({}))
            .build()
            .expect("build request");
        assert!(req.headers().get("Authorization").is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let backend = OpenAiBackend::new(Client::new(), "http://localhost")
            .with_api_key("sk-1234567890abcdef");
        let debug_output = format!("{:?}", backend);
        assert!(!debug_output.contains("1234567890abcdef"));
        assert!(debug_output.contains("sk-123***"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let backend = OpenAiBackend::new(Client::new(), "http://127.0.0.1:9");
        let result = backend.complete(&test_request()).await;
        assert!(matches!(result, Err(EnrichmentError::Request(_))));
    }
}
