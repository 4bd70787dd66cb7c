//! Scripture reference parsing and canonical verse ids.
//!
//! A reference is `<book> <chapter>:<verse>[-<verse>]`, where the book may
//! carry a leading numeral ("1 John", "2Kings"). Anything else is rejected;
//! there is no fuzzy matching and no support for comma-separated lists.
//!
//! ```
//! use scripture_enrichment::reference;
//!
//! let r = reference::parse("Psalm 23:1-3").unwrap();
//! assert_eq!(reference::to_canonical_id(&r).as_str(), "PSA.23.1-3");
//! assert!(reference::parse("John16").is_none());
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn reference_regex() -> &'static Regex {
    REFERENCE_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9]?\s?[A-Za-z]+)\s([0-9]+):([0-9]+)(?:-([0-9]+))?$")
            .expect("reference pattern is a valid regex")
    })
}

/// Book name to content-API abbreviation, Old then New Testament.
const BOOK_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Genesis", "GEN"),
    ("Exodus", "EXO"),
    ("Leviticus", "LEV"),
    ("Numbers", "NUM"),
    ("Deuteronomy", "DEU"),
    ("Joshua", "JOS"),
    ("Judges", "JDG"),
    ("Ruth", "RUT"),
    ("1 Samuel", "1SA"),
    ("2 Samuel", "2SA"),
    ("1 Kings", "1KI"),
    ("2 Kings", "2KI"),
    ("1 Chronicles", "1CH"),
    ("2 Chronicles", "2CH"),
    ("Ezra", "EZR"),
    ("Nehemiah", "NEH"),
    ("Esther", "EST"),
    ("Job", "JOB"),
    ("Psalms", "PSA"),
    ("Psalm", "PSA"),
    ("Proverbs", "PRO"),
    ("Ecclesiastes", "ECC"),
    ("Song of Solomon", "SNG"),
    ("Isaiah", "ISA"),
    ("Jeremiah", "JER"),
    ("Lamentations", "LAM"),
    ("Ezekiel", "EZK"),
    ("Daniel", "DAN"),
    ("Hosea", "HOS"),
    ("Joel", "JOL"),
    ("Amos", "AMO"),
    ("Obadiah", "OBA"),
    ("Jonah", "JON"),
    ("Micah", "MIC"),
    ("Nahum", "NAM"),
    ("Habakkuk", "HAB"),
    ("Zephaniah", "ZEP"),
    ("Haggai", "HAG"),
    ("Zechariah", "ZEC"),
    ("Malachi", "MAL"),
    ("Matthew", "MAT"),
    ("Mark", "MRK"),
    ("Luke", "LUK"),
    ("John", "JHN"),
    ("Acts", "ACT"),
    ("Romans", "ROM"),
    ("1 Corinthians", "1CO"),
    ("2 Corinthians", "2CO"),
    ("Galatians", "GAL"),
    ("Ephesians", "EPH"),
    ("Philippians", "PHP"),
    ("Colossians", "COL"),
    ("1 Thessalonians", "1TH"),
    ("2 Thessalonians", "2TH"),
    ("1 Timothy", "1TI"),
    ("2 Timothy", "2TI"),
    ("Titus", "TIT"),
    ("Philemon", "PHM"),
    ("Hebrews", "HEB"),
    ("James", "JAS"),
    ("1 Peter", "1PE"),
    ("2 Peter", "2PE"),
    ("1 John", "1JN"),
    ("2 John", "2JN"),
    ("3 John", "3JN"),
    ("Jude", "JUD"),
    ("Revelation", "REV"),
];

/// A parsed `Book chapter:verse[-verse]` reference.
///
/// Only [`parse`] constructs one, so chapter and verses are always positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureReference {
    book: String,
    chapter: u32,
    start_verse: u32,
    end_verse: Option<u32>,
}

impl ScriptureReference {
    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn start_verse(&self) -> u32 {
        self.start_verse
    }

    pub fn end_verse(&self) -> Option<u32> {
        self.end_verse
    }
}

impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.start_verse)?;
        if let Some(end) = self.end_verse {
            write!(f, "-{}", end)?;
        }
        Ok(())
    }
}

/// Identifier understood by the scripture content API, e.g. `JHN.3.16`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalVerseId(String);

impl CanonicalVerseId {
    /// Wrap an id that is already in canonical form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalVerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a reference. Returns `None` unless the whole text matches.
pub fn parse(text: &str) -> Option<ScriptureReference> {
    let caps = reference_regex().captures(text)?;

    let book = caps.get(1)?.as_str().to_string();
    let chapter: u32 = caps.get(2)?.as_str().parse().ok()?;
    let start_verse: u32 = caps.get(3)?.as_str().parse().ok()?;
    let end_verse = match caps.get(4) {
        Some(m) => Some(m.as_str().parse::<u32>().ok()?),
        None => None,
    };

    if chapter == 0 || start_verse == 0 || end_verse == Some(0) {
        return None;
    }

    Some(ScriptureReference {
        book,
        chapter,
        start_verse,
        end_verse,
    })
}

/// Purely syntactic check; see
/// [`ScriptureClient::is_valid_reference`](crate::scripture::ScriptureClient::is_valid_reference)
/// for the check that also confirms the verse exists.
pub fn is_well_formed(text: &str) -> bool {
    parse(text).is_some()
}

/// Look up the content-API abbreviation for a book name.
pub fn book_abbreviation(book: &str) -> Option<&'static str> {
    let book = book.trim();
    BOOK_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == book)
        .map(|(_, abbr)| *abbr)
}

/// Build the canonical id for a reference.
///
/// Unknown books get the first three characters of the name, uppercased.
/// That keeps the function total; the symptom of a wrong guess is a
/// "verse not found" from the content API.
pub fn to_canonical_id(reference: &ScriptureReference) -> CanonicalVerseId {
    let abbr = match book_abbreviation(&reference.book) {
        Some(abbr) => abbr.to_string(),
        None => reference
            .book
            .trim()
            .chars()
            .take(3)
            .collect::<String>()
            .to_uppercase(),
    };

    let id = match reference.end_verse {
        Some(end) => format!(
            "{}.{}.{}-{}",
            abbr, reference.chapter, reference.start_verse, end
        ),
        None => format!("{}.{}.{}", abbr, reference.chapter, reference.start_verse),
    };
    CanonicalVerseId(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let r = parse("John 3:16").unwrap();
        assert_eq!(r.book(), "John");
        assert_eq!(r.chapter(), 3);
        assert_eq!(r.start_verse(), 16);
        assert_eq!(r.end_verse(), None);
    }

    #[test]
    fn test_parse_numbered_book() {
        let r = parse("1 John 3:16").unwrap();
        assert_eq!(r.book(), "1 John");
        assert_eq!(to_canonical_id(&r).as_str(), "1JN.3.16");

        let r = parse("2Kings 2:11").unwrap();
        assert_eq!(r.book(), "2Kings");
    }

    #[test]
    fn test_parse_range() {
        let r = parse("Psalm 23:1-3").unwrap();
        assert_eq!(r.end_verse(), Some(3));
        assert_eq!(to_canonical_id(&r).as_str(), "PSA.23.1-3");
        assert_eq!(r.to_string(), "Psalm 23:1-3");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "not a verse",
            "John16",
            "John 3",
            "John 3:16,18",
            "John 3:16 ",
            "John  3:16",
            "Song of Solomon 2:4",
            "\u{0661} John 3:16",
            "John \u{0663}:16",
        ] {
            assert!(parse(text).is_none(), "{:?} should not parse", text);
        }
    }

    #[test]
    fn test_parse_rejects_zero_numbers() {
        assert!(parse("John 0:16").is_none());
        assert!(parse("John 3:0").is_none());
        assert!(parse("John 3:1-0").is_none());
    }

    #[test]
    fn test_canonical_id_contains_numbers() {
        for text in ["Genesis 1:1", "Romans 8:28", "Revelation 21:4-5", "1 Corinthians 13:4"] {
            let r = parse(text).unwrap();
            let id = to_canonical_id(&r);
            assert!(!id.as_str().is_empty());
            let tail = format!(".{}.{}", r.chapter(), r.start_verse());
            assert!(id.as_str().contains(&tail), "{} missing {}", id, tail);
        }
    }

    #[test]
    fn test_known_abbreviations() {
        assert_eq!(book_abbreviation("Genesis"), Some("GEN"));
        assert_eq!(book_abbreviation("1 Corinthians"), Some("1CO"));
        assert_eq!(book_abbreviation("Psalm"), Some("PSA"));
        assert_eq!(book_abbreviation("Psalms"), Some("PSA"));
        assert_eq!(book_abbreviation(" Philippians "), Some("PHP"));
        assert_eq!(book_abbreviation("Hezekiah"), None);
    }

    #[test]
    fn test_table_covers_canon() {
        // 66 books plus the singular "Psalm" alias
        assert_eq!(BOOK_ABBREVIATIONS.len(), 67);
    }

    #[test]
    fn test_unknown_book_falls_back_to_truncation() {
        let r = parse("Hezekiah 4:2").unwrap();
        assert_eq!(to_canonical_id(&r).as_str(), "HEZ.4.2");

        let r = parse("Jn 3:16").unwrap();
        assert_eq!(to_canonical_id(&r).as_str(), "JN.3.16");
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed("Matthew 11:28"));
        assert!(!is_well_formed("Matthew"));
    }
}
