//! Article retrieval by id.
//!
//! Used by `nlens get` and `GET /articles/{id}`. An unknown id is the one
//! lookup failure callers see.

use anyhow::{anyhow, Result};

use news_lens_core::engine::NewsEngine;
use news_lens_core::models::Article;

/// Look up an article, turning a miss into a `not found` error.
pub fn get_article(engine: &NewsEngine, id: usize) -> Result<&Article> {
    engine
        .article(id)
        .ok_or_else(|| anyhow!("article not found: {}", id))
}

/// CLI entry point: prints the article or exits with status 1.
pub fn run_get(engine: &NewsEngine, id: usize) -> Result<()> {
    let article = match get_article(engine, id) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("--- Article ---");
    println!("id:        {}", article.id);
    println!("title:     {}", article.card_title(usize::MAX));
    println!("topic:     {}", article.topic);
    println!("topic_key: {}", article.topic_key);
    println!("tags:      {}", article.tags);
    println!(
        "date:      {}{}",
        article.date_raw,
        if article.date_parsed.is_none() && !article.date_raw.is_empty() {
            " (unparsed)"
        } else {
            ""
        }
    );
    if !article.url.is_empty() {
        println!("url:       {}", article.url);
    }
    println!();
    println!("--- Text ---");
    println!("{}", article.text);

    Ok(())
}
