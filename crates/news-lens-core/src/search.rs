//! Free-text search over the corpus.
//!
//! Resolution order:
//!
//! 1. Empty or whitespace-only query: every article, mode [`SearchMode::All`].
//! 2. Case-insensitive literal substring match against `title`, `text` and
//!    `tags`, in corpus order, mode [`SearchMode::Substring`].
//! 3. If nothing matched: cosine similarity of the vectorized query against
//!    every article, top `fallback_limit` by descending score with ties by
//!    ascending id, mode [`SearchMode::Similarity`].
//!
//! Search never fails. A query with no vocabulary terms still returns a
//! deterministic similarity ranking (all scores zero, so plain id order).

use serde::Serialize;

use crate::corpus::Corpus;
use crate::tfidf::VectorIndex;

/// Default cap on similarity-fallback results.
pub const DEFAULT_FALLBACK_LIMIT: usize = 100;

/// Which resolution path produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    All,
    Substring,
    Similarity,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::All => "all",
            SearchMode::Substring => "substring",
            SearchMode::Similarity => "similarity",
        }
    }
}

/// One matching article. `score` is set only on the similarity path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub mode: SearchMode,
    pub hits: Vec<SearchHit>,
}

impl SearchOutcome {
    pub fn ids(&self) -> Vec<usize> {
        self.hits.iter().map(|h| h.id).collect()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Resolve `query` against the corpus and its index.
pub fn search(corpus: &Corpus, index: &VectorIndex, query: &str, fallback_limit: usize) -> SearchOutcome {
    let q = query.trim();
    if q.is_empty() {
        return SearchOutcome {
            mode: SearchMode::All,
            hits: corpus
                .iter()
                .map(|a| SearchHit { id: a.id, score: None })
                .collect(),
        };
    }

    let hits = substring_matches(corpus, q);
    if !hits.is_empty() {
        return SearchOutcome {
            mode: SearchMode::Substring,
            hits,
        };
    }

    SearchOutcome {
        mode: SearchMode::Similarity,
        hits: similarity_ranking(index, q, fallback_limit),
    }
}

fn substring_matches(corpus: &Corpus, q: &str) -> Vec<SearchHit> {
    let needle = q.to_lowercase();
    corpus
        .iter()
        .filter(|a| {
            [&a.title, &a.text, &a.tags]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .map(|a| SearchHit { id: a.id, score: None })
        .collect()
}

fn similarity_ranking(index: &VectorIndex, q: &str, limit: usize) -> Vec<SearchHit> {
    let sims = index.similarities(&index.transform(q));
    let mut ranked: Vec<(usize, f64)> = sims.into_iter().enumerate().collect();
    // Stable sort keeps ascending id among equal scores.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
        .into_iter()
        .map(|(id, score)| SearchHit {
            id,
            score: Some(score),
        })
        .collect()
}
