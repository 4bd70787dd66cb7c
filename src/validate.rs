//! Strict shape validation of model output.
//!
//! Each validator turns an untrusted [`Value`] into a typed result or a
//! [`ValidationFailure`]. There is no partial acceptance: one bad element
//! rejects the whole payload.

use crate::error::ValidationFailure;
use crate::model::{
    ActionStep, Difficulty, GuideVerse, PrayerPrompt, ReflectionQuestion, Section,
    SectionQuestion, StudyGuide, TagSet,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A verse suggestion as the model returned it, before clamping and stamping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVerseSuggestion {
    pub verse: String,
    pub reference: String,
    pub explanation: String,
    pub relevance_score: f64,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(a) if a.is_empty() => "empty array",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_empty_array<'a>(
    value: &'a Value,
    expected: &'static str,
) -> Result<&'a Vec<Value>, ValidationFailure> {
    match value {
        Value::Array(items) if !items.is_empty() => Ok(items),
        other => Err(ValidationFailure::WrongShape {
            expected,
            found: kind_of(other),
        }),
    }
}

fn required_str(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, ValidationFailure> {
    match obj.get(field).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ValidationFailure::MissingField { index, field }),
    }
}

/// Validate `[{verse, reference, explanation, relevanceScore}, ...]`.
pub fn verse_suggestions(value: &Value) -> Result<Vec<RawVerseSuggestion>, ValidationFailure> {
    let items = non_empty_array(value, "non-empty array of verse objects")?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<RawVerseSuggestion, ValidationFailure> {
            let obj = item.as_object().ok_or(ValidationFailure::WrongShape {
                expected: "verse object",
                found: kind_of(item),
            })?;
            let relevance_score = obj
                .get("relevanceScore")
                .and_then(Value::as_f64)
                .ok_or(ValidationFailure::MissingField {
                    index,
                    field: "relevanceScore",
                })?;
            Ok(RawVerseSuggestion {
                verse: required_str(obj, index, "verse")?,
                reference: required_str(obj, index, "reference")?,
                explanation: required_str(obj, index, "explanation")?,
                relevance_score,
            })
        })
        .collect()
}

/// Validate a non-empty JSON array of strings and normalise it into a [`TagSet`].
pub fn tags(value: &Value) -> Result<TagSet, ValidationFailure> {
    let items = non_empty_array(value, "non-empty array of strings")?;
    let raw = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str()
                .ok_or(ValidationFailure::MissingField { index, field: "tag" })
        })
        .collect::<Result<Vec<&str>, _>>()?;

    let set = TagSet::from_raw(raw);
    if set.is_empty() {
        return Err(ValidationFailure::MissingField { index: 0, field: "tag" });
    }
    Ok(set)
}

// Wire shapes for the study guide. Optional parts default; required parts
// are checked for emptiness after deserializing.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGuide {
    title: String,
    description: String,
    #[serde(default = "default_duration")]
    estimated_duration: u32,
    #[serde(default)]
    difficulty: Option<String>,
    sections: Vec<WireSection>,
    key_verses: Vec<GuideVerse>,
    prayer_prompts: Vec<PrayerPrompt>,
    reflection_questions: Vec<ReflectionQuestion>,
    action_steps: Vec<WireActionStep>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct WireSection {
    title: String,
    content: String,
    #[serde(default)]
    verses: Vec<GuideVerse>,
    #[serde(default)]
    questions: Vec<WireQuestion>,
    #[serde(default)]
    order: Option<u32>,
}

#[derive(Deserialize)]
struct WireQuestion {
    question: String,
    #[serde(rename = "type", default = "default_question_type")]
    kind: String,
    #[serde(default)]
    hints: Vec<String>,
}

#[derive(Deserialize)]
struct WireActionStep {
    step: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    order: Option<u32>,
}

fn default_duration() -> u32 {
    30
}

fn default_question_type() -> String {
    "reflection".to_string()
}

fn parse_difficulty(raw: Option<&str>) -> Result<Difficulty, ValidationFailure> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None => Ok(Difficulty::default()),
        Some("beginner") => Ok(Difficulty::Beginner),
        Some("intermediate") => Ok(Difficulty::Intermediate),
        Some("advanced") => Ok(Difficulty::Advanced),
        Some(_) => Err(ValidationFailure::MissingField {
            index: 0,
            field: "difficulty",
        }),
    }
}

fn check_non_empty(s: &str, index: usize, field: &'static str) -> Result<(), ValidationFailure> {
    if s.trim().is_empty() {
        Err(ValidationFailure::MissingField { index, field })
    } else {
        Ok(())
    }
}

/// Validate a full study guide object.
///
/// The guide must have a title, a description, and at least one section,
/// key verse, prayer prompt, reflection question and action step. Every
/// entry present must have its text filled in.
pub fn study_guide(value: &Value) -> Result<StudyGuide, ValidationFailure> {
    if !value.is_object() {
        return Err(ValidationFailure::WrongShape {
            expected: "study guide object",
            found: kind_of(value),
        });
    }
    let wire: WireGuide = serde_json::from_value(value.clone())
        .map_err(|e| ValidationFailure::Schema(e.to_string()))?;

    check_non_empty(&wire.title, 0, "title")?;
    check_non_empty(&wire.description, 0, "description")?;
    require_items(wire.sections.len(), "sections")?;
    require_items(wire.key_verses.len(), "keyVerses")?;
    require_items(wire.prayer_prompts.len(), "prayerPrompts")?;
    require_items(wire.reflection_questions.len(), "reflectionQuestions")?;
    require_items(wire.action_steps.len(), "actionSteps")?;
    let difficulty = parse_difficulty(wire.difficulty.as_deref())?;

    let mut sections = Vec::with_capacity(wire.sections.len());
    for (index, s) in wire.sections.into_iter().enumerate() {
        check_non_empty(&s.title, index, "sections.title")?;
        check_non_empty(&s.content, index, "sections.content")?;
        check_verses(&s.verses, "sections.verses")?;
        for q in &s.questions {
            check_non_empty(&q.question, index, "sections.questions.question")?;
        }
        sections.push(Section {
            title: s.title,
            content: s.content,
            verses: s.verses,
            questions: s
                .questions
                .into_iter()
                .map(|q| SectionQuestion {
                    question: q.question,
                    kind: q.kind,
                    hints: q.hints,
                })
                .collect(),
            order: s.order.unwrap_or(index as u32 + 1),
        });
    }

    check_verses(&wire.key_verses, "keyVerses")?;
    for (index, p) in wire.prayer_prompts.iter().enumerate() {
        check_non_empty(&p.prompt, index, "prayerPrompts.prompt")?;
    }
    for (index, q) in wire.reflection_questions.iter().enumerate() {
        check_non_empty(&q.question, index, "reflectionQuestions.question")?;
    }

    let mut action_steps = Vec::with_capacity(wire.action_steps.len());
    for (index, a) in wire.action_steps.into_iter().enumerate() {
        check_non_empty(&a.step, index, "actionSteps.step")?;
        action_steps.push(ActionStep {
            step: a.step,
            description: a.description,
            order: a.order.unwrap_or(index as u32 + 1),
        });
    }

    Ok(StudyGuide {
        title: wire.title,
        description: wire.description,
        estimated_duration_minutes: wire.estimated_duration,
        difficulty,
        sections,
        key_verses: wire.key_verses,
        prayer_prompts: wire.prayer_prompts,
        reflection_questions: wire.reflection_questions,
        action_steps,
        tags: TagSet::from_raw(&wire.tags).into_vec(),
    })
}

fn require_items(len: usize, field: &'static str) -> Result<(), ValidationFailure> {
    if len == 0 {
        Err(ValidationFailure::MissingField { index: 0, field })
    } else {
        Ok(())
    }
}

fn check_verses(verses: &[GuideVerse], field: &'static str) -> Result<(), ValidationFailure> {
    for (index, v) in verses.iter().enumerate() {
        check_non_empty(&v.text, index, field)?;
        check_non_empty(&v.reference, index, field)?;
    }
    Ok(())
}
