//! Listing views for `nlens list` and `nlens topics`.

use anyhow::Result;

use news_lens_core::corpus::ArticleSort;
use news_lens_core::engine::NewsEngine;
use news_lens_core::models::Article;

/// One-line summary used by every listing command.
pub fn print_article_line(article: &Article) {
    println!(
        "{:>6}  {:<10}  {:<10}  {}",
        article.id,
        if article.date_raw.is_empty() { "-" } else { article.date_raw.as_str() },
        article.topic_key,
        article.card_title(100)
    );
}

pub fn run_list(engine: &NewsEngine, sort: &str, topic: Option<&str>, limit: Option<usize>) -> Result<()> {
    let sort: ArticleSort = sort.parse()?;
    let articles = match topic {
        Some(t) => engine.by_topic(t, sort),
        None => engine.listing(sort),
    };

    let total = articles.len();
    let shown = limit.unwrap_or(total).min(total);
    for a in articles.iter().take(shown) {
        print_article_line(a);
    }
    println!();
    println!("Showing {} of {} articles", shown, total);
    Ok(())
}

pub fn run_topics(engine: &NewsEngine) -> Result<()> {
    let topics = engine.topics();
    if topics.is_empty() {
        println!("No topics.");
    }
    for t in topics {
        println!("{}", t);
    }
    Ok(())
}
