//! Prompt construction for the enrichment calls.
//!
//! Each builder returns the chat messages for one request. The user message
//! embeds the prayer and spells out the exact JSON shape expected back, which
//! [`validate`](crate::validate) then enforces.

use crate::backend::ChatMessage;
use crate::model::{Prayer, Urgency, VerseSuggestion};

const VERSE_SYSTEM: &str = "You are a compassionate biblical counselor. You suggest scripture \
that speaks directly to a person's prayer request. Respond only with valid JSON.";

const TAG_SYSTEM: &str = "You categorize prayer requests with short topical tags. \
Respond only with a JSON array of strings.";

const GUIDE_SYSTEM: &str = "You are an experienced Bible teacher who writes personal, \
practical study guides. Respond only with valid JSON.";

/// Wrap text in a labeled section for structured prompts.
pub fn section(label: &str, content: &str) -> String {
    format!("## {}\n{}", label, content)
}

/// Messages asking for 3-5 scored verse suggestions.
pub fn verse_messages(prayer_text: &str, category: &str, urgency: Urgency) -> Vec<ChatMessage> {
    let user = [
        section("Prayer request", prayer_text.trim()),
        section("Category", category),
        section("Urgency", urgency.as_str()),
        section(
            "Task",
            "Suggest 3 to 5 Bible verses (NIV) that would encourage this person. \
For each, explain in one or two sentences why it fits the request, and rate its \
relevance from 0.1 to 1.0.",
        ),
        section(
            "Format",
            r#"Return a JSON array only:
[{"verse": "full verse text", "reference": "Book Chapter:Verse", "explanation": "why it fits", "relevanceScore": 0.9}]"#,
        ),
    ]
    .join("\n\n");

    vec![ChatMessage::system(VERSE_SYSTEM), ChatMessage::user(user)]
}

/// Messages asking for 5-8 lowercase tags.
pub fn tag_messages(prayer_text: &str, category: &str) -> Vec<ChatMessage> {
    let user = [
        section("Prayer request", prayer_text.trim()),
        section("Category", category),
        section(
            "Task",
            "Generate 5 to 8 short, lowercase, single-word tags describing the themes of this prayer.",
        ),
        section("Format", r#"Return a JSON array only: ["tag1", "tag2"]"#),
    ]
    .join("\n\n");

    vec![ChatMessage::system(TAG_SYSTEM), ChatMessage::user(user)]
}

/// Messages asking for a complete study guide built on the given verses.
pub fn study_guide_messages(prayer: &Prayer, verses: &[VerseSuggestion]) -> Vec<ChatMessage> {
    let verse_list = if verses.is_empty() {
        "(none yet; choose fitting passages yourself)".to_string()
    } else {
        verses
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}. {} - \"{}\"", i + 1, v.reference, v.text))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let user = [
        section("Prayer title", prayer.title.trim()),
        section("Prayer request", prayer.content.trim()),
        section("Category", &prayer.category),
        section("Urgency", prayer.urgency.as_str()),
        section("Suggested verses", &verse_list),
        section(
            "Task",
            "Write a personal Bible study guide for this person. Requirements:
- title of at most 50 characters, description of at most 200 characters
- 3 to 5 sections, each with content, supporting verses and discussion questions
- key verses for memorization
- exactly 5 prayer prompts, each from a different category (praise, confession, thanksgiving, petition, intercession)
- 5 reflection questions
- 3 to 5 practical action steps, in order
- relevant lowercase tags",
        ),
        section(
            "Format",
            r#"Return a JSON object only:
{
  "title": "...",
  "description": "...",
  "estimatedDuration": 30,
  "difficulty": "beginner|intermediate|advanced",
  "sections": [{"title": "...", "content": "...", "verses": [{"text": "...", "reference": "..."}], "questions": [{"question": "...", "type": "reflection|application|discussion", "hints": ["..."]}], "order": 1}],
  "keyVerses": [{"text": "...", "reference": "...", "explanation": "..."}],
  "prayerPrompts": [{"prompt": "...", "category": "praise"}],
  "reflectionQuestions": [{"question": "...", "category": "personal"}],
  "actionSteps": [{"step": "...", "description": "...", "order": 1}],
  "tags": ["..."]
}"#,
        ),
    ]
    .join("\n\n");

    vec![ChatMessage::system(GUIDE_SYSTEM), ChatMessage::user(user)]
}
