//! Pre-authored content substituted when the AI or content API fails.
//!
//! [`FallbackLibrary`] is built once and shared as `Arc<FallbackLibrary>`.
//! Lookups are total: a category without its own entry gets the default
//! entry, never an error.
//!
//! Verse fallbacks exist for only two categories; everything else shares the
//! default spiritual list. Tag fallbacks exist for every category.

use crate::model::{
    ActionStep, Difficulty, GuideVerse, Prayer, PrayerPrompt, ReflectionQuestion, Section,
    SectionQuestion, StudyGuide, TagSet, VerseSuggestion,
};
use std::collections::HashMap;

/// The prayer categories the application offers.
pub const CATEGORIES: [&str; 13] = [
    "healing",
    "family",
    "relationships",
    "work",
    "finances",
    "guidance",
    "anxiety",
    "grief",
    "protection",
    "gratitude",
    "salvation",
    "spiritual",
    "community",
];

/// Key of the default entry in every table.
pub const DEFAULT_CATEGORY: &str = "other";

const TAGS: &[(&str, [&str; 4])] = &[
    ("healing", ["healing", "health", "recovery", "strength"]),
    ("family", ["family", "love", "unity", "home"]),
    ("relationships", ["relationships", "love", "reconciliation", "trust"]),
    ("work", ["work", "career", "provision", "purpose"]),
    ("finances", ["finances", "provision", "trust", "stewardship"]),
    ("guidance", ["guidance", "wisdom", "direction", "discernment"]),
    ("anxiety", ["anxiety", "peace", "comfort", "trust"]),
    ("grief", ["grief", "comfort", "hope", "loss"]),
    ("protection", ["protection", "safety", "refuge", "courage"]),
    ("gratitude", ["gratitude", "thanksgiving", "praise", "joy"]),
    ("salvation", ["salvation", "faith", "grace", "redemption"]),
    ("spiritual", ["faith", "growth", "prayer", "devotion"]),
    ("community", ["community", "church", "fellowship", "service"]),
    (DEFAULT_CATEGORY, ["prayer", "faith", "hope", "support"]),
];

struct FallbackVerse {
    text: &'static str,
    reference: &'static str,
    explanation: &'static str,
    relevance_score: f64,
}

const HEALING_VERSES: &[FallbackVerse] = &[
    FallbackVerse {
        text: "He heals the brokenhearted and binds up their wounds.",
        reference: "Psalm 147:3",
        explanation: "God cares for every wound, seen and unseen, and is present in the work of healing.",
        relevance_score: 0.9,
    },
    FallbackVerse {
        text: "But he was pierced for our transgressions, he was crushed for our iniquities; the punishment that brought us peace was on him, and by his wounds we are healed.",
        reference: "Isaiah 53:5",
        explanation: "Healing and peace are rooted in what God has already done.",
        relevance_score: 0.8,
    },
    FallbackVerse {
        text: "Is anyone among you sick? Let them call the elders of the church to pray over them and anoint them with oil in the name of the Lord.",
        reference: "James 5:14",
        explanation: "Sickness is carried together in prayer by the community of faith.",
        relevance_score: 0.7,
    },
];

const GUIDANCE_VERSES: &[FallbackVerse] = &[
    FallbackVerse {
        text: "Trust in the Lord with all your heart and lean not on your own understanding; in all your ways submit to him, and he will make your paths straight.",
        reference: "Proverbs 3:5-6",
        explanation: "Direction comes from trusting God rather than our own limited view.",
        relevance_score: 0.9,
    },
    FallbackVerse {
        text: "If any of you lacks wisdom, you should ask God, who gives generously to all without finding fault, and it will be given to you.",
        reference: "James 1:5",
        explanation: "God invites us to ask for wisdom and promises to give it freely.",
        relevance_score: 0.8,
    },
];

const DEFAULT_VERSES: &[FallbackVerse] = &[
    FallbackVerse {
        text: "Do not be anxious about anything, but in every situation, by prayer and petition, with thanksgiving, present your requests to God.",
        reference: "Philippians 4:6",
        explanation: "Every concern can be brought to God in prayer.",
        relevance_score: 0.8,
    },
    FallbackVerse {
        text: "Come to me, all you who are weary and burdened, and I will give you rest.",
        reference: "Matthew 11:28",
        explanation: "Jesus offers rest to everyone carrying a heavy load.",
        relevance_score: 0.7,
    },
    FallbackVerse {
        text: "And we know that in all things God works for the good of those who love him, who have been called according to his purpose.",
        reference: "Romans 8:28",
        explanation: "God is at work even in circumstances we do not understand.",
        relevance_score: 0.7,
    },
];

fn to_suggestions(verses: &[FallbackVerse]) -> Vec<VerseSuggestion> {
    verses
        .iter()
        .map(|v| VerseSuggestion {
            text: v.text.to_string(),
            reference: v.reference.to_string(),
            explanation: v.explanation.to_string(),
            relevance_score: v.relevance_score,
            ai_generated: false,
            translation: "NIV".to_string(),
        })
        .collect()
}

/// Immutable fallback tables, keyed by category.
#[derive(Debug, Clone)]
pub struct FallbackLibrary {
    verses: HashMap<String, Vec<VerseSuggestion>>,
    default_verses: Vec<VerseSuggestion>,
    tags: HashMap<String, TagSet>,
    default_tags: TagSet,
}

impl FallbackLibrary {
    /// The built-in tables.
    pub fn standard() -> Self {
        let mut verses = HashMap::new();
        verses.insert("healing".to_string(), to_suggestions(HEALING_VERSES));
        verses.insert("guidance".to_string(), to_suggestions(GUIDANCE_VERSES));

        let mut tags = HashMap::new();
        let mut default_tags = TagSet::default();
        for (category, list) in TAGS {
            let set = TagSet::from_raw(list.iter());
            if *category == DEFAULT_CATEGORY {
                default_tags = set;
            } else {
                tags.insert(category.to_string(), set);
            }
        }

        Self {
            verses,
            default_verses: to_suggestions(DEFAULT_VERSES),
            tags,
            default_tags,
        }
    }

    /// Verse suggestions for a category, or the default list.
    pub fn verses_for(&self, category: &str) -> Vec<VerseSuggestion> {
        self.verses
            .get(&normalize(category))
            .unwrap_or(&self.default_verses)
            .clone()
    }

    /// Four tags for a category, or the `other` set.
    pub fn tags_for(&self, category: &str) -> TagSet {
        self.tags
            .get(&normalize(category))
            .unwrap_or(&self.default_tags)
            .clone()
    }

    /// A minimal but complete guide: one of each part.
    pub fn study_guide_for(&self, prayer: &Prayer) -> StudyGuide {
        let key_verse = self
            .verses_for(&prayer.category)
            .into_iter()
            .next()
            .map(|v| GuideVerse {
                text: v.text,
                reference: v.reference,
                explanation: v.explanation,
            })
            .unwrap_or_else(|| GuideVerse {
                text: "Come to me, all you who are weary and burdened, and I will give you rest."
                    .to_string(),
                reference: "Matthew 11:28".to_string(),
                explanation: String::new(),
            });

        let topic = if prayer.title.trim().is_empty() {
            "Your Prayer".to_string()
        } else {
            prayer.title.trim().to_string()
        };
        let title: String = format!("Finding Strength: {}", topic).chars().take(50).collect();

        StudyGuide {
            title,
            description: "A short guided study to reflect on God's promises while you pray about this request."
                .to_string(),
            estimated_duration_minutes: 15,
            difficulty: Difficulty::Beginner,
            sections: vec![Section {
                title: "Bringing It to God".to_string(),
                content: "Read the key verse slowly. Notice what it says about God's character \
and how it speaks to your situation."
                    .to_string(),
                verses: vec![key_verse.clone()],
                questions: vec![SectionQuestion {
                    question: "What does this passage reveal about how God sees your situation?"
                        .to_string(),
                    kind: "reflection".to_string(),
                    hints: vec!["Consider God's promises in the verse.".to_string()],
                }],
                order: 1,
            }],
            key_verses: vec![key_verse],
            prayer_prompts: vec![PrayerPrompt {
                prompt: "Tell God honestly how you feel, and ask for His peace and guidance."
                    .to_string(),
                category: "petition".to_string(),
            }],
            reflection_questions: vec![ReflectionQuestion {
                question: "Where have you seen God's faithfulness in the past?".to_string(),
                category: "personal".to_string(),
            }],
            action_steps: vec![ActionStep {
                step: "Pray daily".to_string(),
                description: "Set aside a few minutes each day this week to pray about this request."
                    .to_string(),
                order: 1,
            }],
            tags: self.tags_for(&prayer.category).into_vec(),
        }
    }
}

impl Default for FallbackLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(category: &str) -> String {
    category.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MAX_TAGS;

    #[test]
    fn test_tags_for_every_category() {
        let library = FallbackLibrary::standard();
        for category in CATEGORIES {
            let tags = library.tags_for(category);
            assert!(!tags.is_empty(), "{} has no tags", category);
            assert!(tags.len() <= MAX_TAGS);
            for tag in tags.as_slice() {
                assert_eq!(tag, &tag.to_lowercase());
                assert!(!tag.contains(char::is_whitespace));
            }
        }
    }

    #[test]
    fn test_unknown_category_gets_other_tags() {
        let library = FallbackLibrary::standard();
        let tags = library.tags_for("underwater-basket-weaving");
        assert_eq!(tags.as_slice(), &["prayer", "faith", "hope", "support"]);
    }

    #[test]
    fn test_category_lookup_is_case_insensitive() {
        let library = FallbackLibrary::standard();
        assert_eq!(library.tags_for(" Healing"), library.tags_for("healing"));
    }

    #[test]
    fn test_verses_explicit_and_default() {
        let library = FallbackLibrary::standard();
        let healing = library.verses_for("healing");
        assert_eq!(healing.len(), 3);
        assert_eq!(healing[0].reference, "Psalm 147:3");
        assert!(healing.iter().all(|v| !v.ai_generated));

        assert_eq!(library.verses_for("guidance")[0].reference, "Proverbs 3:5-6");
        // categories without their own entry share the default list
        assert_eq!(library.verses_for("family"), library.verses_for("other"));
        assert!(!library.verses_for("nonexistent").is_empty());
    }

    #[test]
    fn test_study_guide_is_complete() {
        let library = FallbackLibrary::standard();
        let prayer = Prayer::new("Recovery", "Please pray for my recovery", "healing");
        let guide = library.study_guide_for(&prayer);

        assert!(guide.title.contains("Recovery"));
        assert!(guide.title.chars().count() <= 50);
        assert_eq!(guide.sections.len(), 1);
        assert_eq!(guide.sections[0].verses.len(), 1);
        assert_eq!(guide.key_verses.len(), 1);
        assert_eq!(guide.key_verses[0].reference, "Psalm 147:3");
        assert_eq!(guide.prayer_prompts.len(), 1);
        assert_eq!(guide.reflection_questions.len(), 1);
        assert_eq!(guide.action_steps.len(), 1);
        assert_eq!(guide.tags, vec!["healing", "health", "recovery", "strength"]);
    }

    #[test]
    fn test_study_guide_title_is_truncated() {
        let library = FallbackLibrary::standard();
        let prayer = Prayer::new("x".repeat(120), "content", "other");
        assert_eq!(library.study_guide_for(&prayer).title.chars().count(), 50);
    }
}
