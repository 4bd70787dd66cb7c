//! Example: enriching a prayer request without live services.
//!
//! Run with: `cargo run --example enrich_prayer`

use scripture_enrichment::backend::mock::MockReply;
use scripture_enrichment::scripture::catalog;
use scripture_enrichment::{
    EnrichmentGenerator, FixedRandom, MockBackend, MockScriptureApi, Prayer, RetryPolicy,
    ScriptureClient, Urgency,
};
use std::sync::Arc;
use std::time::Duration;

const VERSES: &str = r#"```json
[
  {"verse": "He heals the brokenhearted and binds up their wounds.", "reference": "Psalm 147:3", "explanation": "God cares for those who hurt.", "relevanceScore": 0.95},
  {"verse": "Cast all your anxiety on him because he cares for you.", "reference": "1 Peter 5:7", "explanation": "An invitation to hand over worry.", "relevanceScore": 1.4}
]
```"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    scripture_enrichment::logging::init_logging("info");

    // First call fails, second answers with fenced JSON, third is not JSON
    let mock = MockBackend::new(vec![
        MockReply::Status(503),
        MockReply::Text(VERSES.to_string()),
        MockReply::Text("I'm sorry, I can't help with that.".to_string()),
    ]);
    let generator = EnrichmentGenerator::new(Arc::new(mock))
        .with_policy(RetryPolicy::new(2, Duration::from_millis(100)));

    let prayer = Prayer::new(
        "Surgery next week",
        "Please pray for a smooth surgery and quick recovery.",
        "healing",
    )
    .with_urgency(Urgency::High);

    let verses = generator
        .generate_verses(&prayer.content, &prayer.category, prayer.urgency)
        .await;
    println!("Verses:");
    for v in &verses {
        println!("  {} ({:.2}, ai: {})", v.reference, v.relevance_score, v.ai_generated);
    }

    // The remaining replies do not validate, so tags come from the fallback library
    let tags = generator.generate_tags(&prayer.content, &prayer.category).await;
    println!("Tags: {}", tags.as_slice().join(", "));

    let scripture = ScriptureClient::new(Arc::new(MockScriptureApi::new()))
        .with_random(Arc::new(FixedRandom(0)));
    if let Some(verse) = scripture.get_verse_of_the_day(catalog::DEFAULT_TRANSLATION_ID).await {
        println!("Verse of the day: {}", verse.id);
    }
    let translations = scripture
        .get_multiple_translations("John 3:16", &["KJV", "WEB", "XYZ"])
        .await;
    for t in &translations {
        println!("  [{}] {}", t.translation, t.verse);
    }

    Ok(())
}
