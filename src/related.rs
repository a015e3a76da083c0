//! Related-article cards for `nlens related` and `GET /articles/{id}/related`.

use anyhow::Result;
use serde::Serialize;

use news_lens_core::engine::NewsEngine;
use news_lens_core::recommend::RecommendExplanation;

use crate::get::get_article;

/// Card titles are cut to this many characters.
pub const CARD_TITLE_CHARS: usize = 140;

#[derive(Debug, Clone, Serialize)]
pub struct RelatedCard {
    pub id: usize,
    pub title: String,
    pub topic: String,
    pub topic_key: String,
    pub date: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<RecommendExplanation>,
}

/// Cards for the articles related to `id`. Fails only if `id` is unknown.
pub fn related_cards(engine: &NewsEngine, id: usize, top_k: Option<usize>, explain: bool) -> Result<Vec<RelatedCard>> {
    get_article(engine, id)?;

    Ok(engine
        .recommend(id, top_k)
        .into_iter()
        .filter_map(|r| {
            let a = engine.article(r.id)?;
            Some(RelatedCard {
                id: a.id,
                title: a.card_title(CARD_TITLE_CHARS),
                topic: a.topic.clone(),
                topic_key: a.topic_key.to_string(),
                date: a.date_raw.clone(),
                score: r.score,
                explain: if explain { r.explain } else { None },
            })
        })
        .collect())
}

pub fn run_related(engine: &NewsEngine, id: usize, top_k: Option<usize>, explain: bool) -> Result<()> {
    let cards = match related_cards(engine, id, top_k, explain) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cards.is_empty() {
        println!("No related articles.");
        return Ok(());
    }

    for (i, c) in cards.iter().enumerate() {
        println!("{}. [{:.4}] #{} {}", i + 1, c.score, c.id, c.title);
        println!("    topic: {} ({})  date: {}", c.topic, c.topic_key, c.date);
        if let Some(e) = &c.explain {
            println!(
                "    similarity: {:.4}  boost: {:.2}  age: {}d{}  decay: {:.4}",
                e.similarity,
                e.topic_boost,
                e.age_days,
                if e.age_imputed { " (imputed)" } else { "" },
                e.decay
            );
        }
    }
    Ok(())
}
