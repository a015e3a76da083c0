//! The explicitly constructed query context.
//!
//! A [`NewsEngine`] owns one immutable corpus and the vector index built from
//! it. It is `Send + Sync`; the serving layer wraps it in an `Arc` and every
//! query is a plain read.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::analytics::{analytics, Analytics};
use crate::corpus::{ArticleSort, Corpus, NormalizationReport};
use crate::models::Article;
use crate::recommend::{recommend_at, RecommendParams, Recommendation};
use crate::search::{search, SearchOutcome, DEFAULT_FALLBACK_LIMIT};
use crate::tfidf::{IndexOptions, VectorIndex};

/// Query-time settings held by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    pub recommend: RecommendParams,
    pub search_fallback_limit: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            recommend: RecommendParams::default(),
            search_fallback_limit: DEFAULT_FALLBACK_LIMIT,
        }
    }
}

/// Overview numbers for `stats` views.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub articles: usize,
    pub vocabulary_size: usize,
    pub dated: usize,
    pub topic_keys: BTreeMap<String, usize>,
    pub normalization: NormalizationReport,
}

#[derive(Debug, Clone)]
pub struct NewsEngine {
    corpus: Corpus,
    index: VectorIndex,
    params: EngineParams,
}

impl NewsEngine {
    /// Build the index over `corpus` and bundle both.
    pub fn new(corpus: Corpus, index_opts: IndexOptions, params: EngineParams) -> NewsEngine {
        let index = VectorIndex::build(&corpus, index_opts);
        debug_assert_eq!(index.len(), corpus.len());
        NewsEngine {
            corpus,
            index,
            params,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn article(&self, id: usize) -> Option<&Article> {
        self.corpus.get(id)
    }

    pub fn articles(&self) -> &[Article] {
        self.corpus.articles()
    }

    pub fn listing(&self, sort: ArticleSort) -> Vec<&Article> {
        self.corpus.listing(sort)
    }

    pub fn by_topic(&self, topic: &str, sort: ArticleSort) -> Vec<&Article> {
        self.corpus.by_topic(topic, sort)
    }

    pub fn topics(&self) -> Vec<String> {
        self.corpus.topics()
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        search(&self.corpus, &self.index, query, self.params.search_fallback_limit)
    }

    /// Related articles for `article_id`, `top_k` overriding the configured default.
    pub fn recommend(&self, article_id: usize, top_k: Option<usize>) -> Vec<Recommendation> {
        self.recommend_at(article_id, top_k, Utc::now().naive_utc())
    }

    pub fn recommend_at(&self, article_id: usize, top_k: Option<usize>, now: NaiveDateTime) -> Vec<Recommendation> {
        let mut params = self.params.recommend;
        if let Some(k) = top_k {
            params.top_k = k;
        }
        recommend_at(&self.corpus, &self.index, article_id, &params, now)
    }

    pub fn analytics(&self) -> Analytics {
        analytics(&self.corpus)
    }

    pub fn stats(&self) -> EngineStats {
        let mut topic_keys = BTreeMap::new();
        for a in self.corpus.iter() {
            *topic_keys.entry(a.topic_key.to_string()).or_insert(0) += 1;
        }
        EngineStats {
            articles: self.corpus.len(),
            vocabulary_size: self.index.vocabulary_size(),
            dated: self.corpus.iter().filter(|a| a.date_parsed.is_some()).count(),
            topic_keys,
            normalization: self.corpus.report(),
        }
    }
}
