//! Corpus and index overview for `nlens stats`.

use anyhow::Result;

use news_lens_core::engine::NewsEngine;

use crate::config::Config;

pub fn run_stats(config: &Config, engine: &NewsEngine) -> Result<()> {
    let stats = engine.stats();

    println!("News Lens — Corpus Stats");
    println!("========================");
    println!();
    println!("  Data source: {}", config.data.path.display());
    println!("  Articles:    {}", stats.articles);
    println!(
        "  Dated:       {} / {} ({}%)",
        stats.dated,
        stats.articles,
        if stats.articles > 0 {
            stats.dated * 100 / stats.articles
        } else {
            0
        }
    );
    println!("  Vocabulary:  {} terms", stats.vocabulary_size);
    println!();
    println!("  By topic key:");
    for (key, count) in &stats.topic_keys {
        println!("    {:<10} {}", key, count);
    }
    println!();
    println!("  Normalization fallbacks:");
    println!("    undated:        {}", stats.normalization.undated);
    println!("    default topic:  {}", stats.normalization.default_topic);
    println!("    truncated text: {}", stats.normalization.truncated_text);

    Ok(())
}
