//! Analytics output for `nlens analytics`.

use anyhow::Result;

use news_lens_core::analytics::KeywordSource;
use news_lens_core::engine::NewsEngine;

pub fn run_analytics(engine: &NewsEngine, json: bool) -> Result<()> {
    let charts = engine.analytics();

    if json {
        println!("{}", serde_json::to_string_pretty(&charts)?);
        return Ok(());
    }

    println!("--- Topics ---");
    for (topic, n) in &charts.topics.0 {
        println!("  {:<24} {}", topic, n);
    }
    println!();
    println!("--- Timeline ---");
    if charts.timeline.is_empty() {
        println!("  (no dated articles)");
    }
    for (period, n) in &charts.timeline {
        println!("  {}  {}", period, n);
    }
    println!();
    println!(
        "--- Top keywords ({}) ---",
        match charts.keyword_source {
            KeywordSource::Tags => "from tags",
            KeywordSource::TitleText => "from title and text",
        }
    );
    for (word, n) in &charts.top_tags.0 {
        println!("  {:<24} {}", word, n);
    }
    Ok(())
}
