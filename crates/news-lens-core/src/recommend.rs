//! Related-article ranking.
//!
//! For a seed article every candidate is scored as
//!
//! ```text
//! score = (cosine(seed, candidate) + boost·[same topic]) · exp(-age_days / decay_days)
//! ```
//!
//! The seed's own similarity is replaced by [`SELF_SENTINEL`] before boosting
//! and decay. Boost adds less than `1.0` and decay is finite and strictly
//! positive, so the seed's final score stays negative while every real
//! candidate is non-negative; it always ranks last and is never selected.
//!
//! Undated candidates take the age of the oldest dated article in the
//! corpus, or `decay_days` when nothing is dated.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::corpus::Corpus;
use crate::date::age_days;
use crate::tfidf::VectorIndex;

/// Similarity assigned to the seed itself.
pub const SELF_SENTINEL: f64 = -1.0;

/// Bound on `|age_days / decay_days|` so decay stays finite and non-zero
/// for dates centuries away from `now`.
pub const MAX_DECAY_EXPONENT: f64 = 700.0;

/// Scoring knobs for related-article ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendParams {
    pub top_k: usize,
    /// Additive bonus for candidates sharing the seed's raw topic.
    pub topic_boost: f64,
    /// e-folding time of the recency decay, in days.
    pub decay_days: f64,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            topic_boost: 0.05,
            decay_days: 365.0,
        }
    }
}

/// One related article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: usize,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<RecommendExplanation>,
}

/// Breakdown of a [`Recommendation`] score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendExplanation {
    pub similarity: f64,
    pub topic_boost: f64,
    pub age_days: f64,
    /// True when the candidate had no parsed date and took the fallback age.
    pub age_imputed: bool,
    pub decay: f64,
}

/// Rank related articles for `article_id` relative to the current time.
pub fn recommend(
    corpus: &Corpus,
    index: &VectorIndex,
    article_id: usize,
    params: &RecommendParams,
) -> Vec<Recommendation> {
    recommend_at(corpus, index, article_id, params, Utc::now().naive_utc())
}

/// Rank related articles for `article_id` with an explicit `now`.
///
/// Returns an empty list for an unknown id. Results are sorted by
/// descending score with ties broken by ascending id.
pub fn recommend_at(
    corpus: &Corpus,
    index: &VectorIndex,
    article_id: usize,
    params: &RecommendParams,
    now: NaiveDateTime,
) -> Vec<Recommendation> {
    let (Some(seed), Some(seed_row)) = (corpus.get(article_id), index.row(article_id)) else {
        return Vec::new();
    };

    let mut sims = index.similarities(seed_row);
    sims[article_id] = SELF_SENTINEL;

    let seed_topic = seed.topic_normalized();
    let fallback_age = corpus
        .iter()
        .filter_map(|a| a.date_parsed)
        .map(|d| age_days(d, now))
        .max()
        .map(|d| d as f64)
        .unwrap_or(params.decay_days);

    let mut scored: Vec<Recommendation> = corpus
        .iter()
        .zip(sims)
        .map(|(candidate, similarity)| {
            let boost = if !seed_topic.is_empty() && candidate.topic_normalized() == seed_topic {
                params.topic_boost
            } else {
                0.0
            };
            let (age, imputed) = match candidate.date_parsed {
                Some(d) => (age_days(d, now) as f64, false),
                None => (fallback_age, true),
            };
            let decay = decay_factor(age, params.decay_days);
            Recommendation {
                id: candidate.id,
                score: (similarity + boost) * decay,
                explain: Some(RecommendExplanation {
                    similarity,
                    topic_boost: boost,
                    age_days: age,
                    age_imputed: imputed,
                    decay,
                }),
            }
        })
        .collect();

    // Stable: equal scores stay in ascending id order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(params.top_k.min(corpus.len().saturating_sub(1)));
    scored
}

/// `exp(-age_days / decay_days)`, with the exponent clamped to
/// `±MAX_DECAY_EXPONENT`.
pub fn decay_factor(age_days: f64, decay_days: f64) -> f64 {
    (-age_days / decay_days)
        .clamp(-MAX_DECAY_EXPONENT, MAX_DECAY_EXPONENT)
        .exp()
}
