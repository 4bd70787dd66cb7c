//! Locating the JSON payload inside completion text.
//!
//! The payload is either the whole completion or the body of a `json` (or
//! bare) markdown fence, optionally after a `<think>` block. JSON embedded in
//! unfenced prose is not searched for and is rejected. Nothing is repaired;
//! shape checking happens afterwards in [`validate`](crate::validate).

use crate::error::ValidationFailure;
use serde_json::Value;

/// Remove a leading `<think>...</think>` block, if any.
pub fn strip_thinking(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("<think>") {
        if let Some(end) = rest.find("</think>") {
            return rest[end + "</think>".len()..].trim();
        }
    }
    trimmed
}

/// Extract content from the first markdown fenced code block.
///
/// Recognizes `` ```json ``, `` ```JSON ``, and plain `` ``` `` fences.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let body_start = after.find('\n')?;
    let lang = after[..body_start].trim();
    if !lang.is_empty() && !lang.eq_ignore_ascii_case("json") {
        return None;
    }
    let body = &after[body_start + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Parse the JSON payload out of a completion.
///
/// Tries the whole text, then the first fenced block.
pub fn extract_payload(text: &str) -> Result<Value, ValidationFailure> {
    let cleaned = strip_thinking(text);
    if cleaned.is_empty() {
        return Err(ValidationFailure::EmptyResponse);
    }

    if let Ok(val) = serde_json::from_str::<Value>(cleaned) {
        return Ok(val);
    }

    if let Some(block) = extract_fenced_block(cleaned) {
        if let Ok(val) = serde_json::from_str::<Value>(block) {
            return Ok(val);
        }
    }

    Err(ValidationFailure::NotJson(truncate(cleaned, 120)))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
