//! Static tables used by the scripture client.

use super::BibleTranslation;

/// `(id, name, abbreviation)` of the translations offered to users.
const TRANSLATIONS: [(&str, &str, &str); 5] = [
    ("de4e12af7f28f599-02", "King James Version", "KJV"),
    ("06125adad2d5898a-01", "American Standard Version", "ASV"),
    ("9879dbb7cfe39e4d-04", "World English Bible", "WEB"),
    ("78a9f6124f344018-01", "New International Version", "NIV"),
    ("01b29f4b342acc35-01", "Literal Standard Version", "LSV"),
];

/// Translation used when the caller does not pick one (KJV).
pub const DEFAULT_TRANSLATION_ID: &str = "de4e12af7f28f599-02";

/// Candidates for the verse of the day.
pub const VERSE_OF_THE_DAY: [&str; 10] = [
    "JHN.3.16",
    "PHP.4.13",
    "JER.29.11",
    "ROM.8.28",
    "PSA.23.1",
    "PRO.3.5",
    "ISA.40.31",
    "MAT.11.28",
    "JOS.1.9",
    "2CO.5.17",
];

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("healing", &["heal", "healing", "restore", "strength", "recovery"]),
    ("family", &["family", "children", "household", "love"]),
    ("relationships", &["love", "forgive", "friend", "unity"]),
    ("work", &["work", "labor", "diligent", "provide"]),
    ("finances", &["provide", "treasure", "riches", "needs"]),
    ("guidance", &["guide", "wisdom", "path", "direction", "counsel"]),
    ("anxiety", &["anxious", "peace", "fear", "worry", "rest"]),
    ("grief", &["comfort", "mourn", "tears", "sorrow"]),
    ("protection", &["protect", "refuge", "shield", "fortress", "safety"]),
    ("gratitude", &["thanks", "thanksgiving", "praise", "grateful"]),
    ("salvation", &["salvation", "saved", "grace", "redeem"]),
    ("spiritual", &["faith", "spirit", "prayer", "grow"]),
    ("community", &["church", "fellowship", "together", "body"]),
    ("other", &["hope", "faith", "love", "peace"]),
];

pub fn translations() -> Vec<BibleTranslation> {
    TRANSLATIONS
        .iter()
        .map(|(id, name, abbreviation)| BibleTranslation {
            id: id.to_string(),
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
        })
        .collect()
}

/// Translation id for an abbreviation such as `"kjv"` (case-insensitive).
pub fn translation_id(abbreviation: &str) -> Option<&'static str> {
    let abbreviation = abbreviation.trim();
    TRANSLATIONS
        .iter()
        .find(|(_, _, abbr)| abbr.eq_ignore_ascii_case(abbreviation))
        .map(|(id, _, _)| *id)
}

/// Search keywords for a category; unknown categories get the `other` list.
pub fn category_keywords(category: &str) -> &'static [&'static str] {
    let category = category.trim().to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(name, _)| *name == category)
        .or_else(|| CATEGORY_KEYWORDS.iter().find(|(name, _)| *name == "other"))
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}
