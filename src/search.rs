//! Search entry points.
//!
//! The resolution itself lives in `news_lens_core::search`. This wrapper
//! resolves hits to articles and re-sorts them newest first for display,
//! which is how every listing view presents results.

use anyhow::Result;

use news_lens_core::corpus::{sort_articles, ArticleSort};
use news_lens_core::engine::NewsEngine;
use news_lens_core::models::Article;
use news_lens_core::search::SearchMode;

use crate::list::print_article_line;

/// Search results resolved to articles, newest first.
pub struct SearchResults<'a> {
    pub mode: SearchMode,
    pub articles: Vec<&'a Article>,
}

pub fn search_articles<'a>(engine: &'a NewsEngine, query: &str) -> SearchResults<'a> {
    let outcome = engine.search(query);
    let mut articles: Vec<&Article> = outcome
        .hits
        .iter()
        .filter_map(|h| engine.article(h.id))
        .collect();
    sort_articles(&mut articles, ArticleSort::DateDesc);
    SearchResults {
        mode: outcome.mode,
        articles,
    }
}

pub fn run_search(engine: &NewsEngine, query: &str, limit: Option<usize>) -> Result<()> {
    let results = search_articles(engine, query);
    let total = results.articles.len();

    println!("mode: {}  ({} results)", results.mode.as_str(), total);
    println!();
    for a in results.articles.iter().take(limit.unwrap_or(total)) {
        print_article_line(a);
    }
    Ok(())
}
