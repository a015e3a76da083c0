//! Corpus analytics: topic counts, monthly timeline and top keywords.
//!
//! [`analytics`] is a pure function of the corpus and is recomputed on every
//! call. Keyword counting picks exactly one [`KeywordSource`] per corpus:
//!
//! | Condition | Source | Tokens |
//! |-----------|--------|--------|
//! | any article has non-empty `tags` | [`KeywordSource::Tags`] | split on `[,;\s]+`, lowercased, len ≥ 3 |
//! | otherwise | [`KeywordSource::TitleText`] | `[a-z]{3,}` runs of lowercased title, then text, minus stopwords |

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::corpus::Corpus;
use crate::date::period_key;

pub const TOP_TOPICS: usize = 10;
pub const TOP_TAGS: usize = 20;
/// Label used for articles without a topic.
pub const UNKNOWN_TOPIC: &str = "Unknown";

static TAG_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;\s]+").unwrap());
static ALPHA_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]{3,}").unwrap());

static KEYWORD_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    "the a an to of for and or is are be on in at with by from as this that those these into \
     over under about it its was were been being our your their them they you we i he she his \
     her not no yes if then else when where who whom which will would can could should may \
     might one two three new latest breaking update said more just"
        .split_whitespace()
        .collect()
});

/// Counts in rank order, serialized as a JSON object that keeps that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts(pub Vec<(String, usize)>);

impl RankedCounts {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, n)| *n)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Where top keywords were drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Tags,
    TitleText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub topics: RankedCounts,
    /// `YYYY-MM` → count, ascending.
    pub timeline: BTreeMap<String, usize>,
    pub top_tags: RankedCounts,
    pub keyword_source: KeywordSource,
}

pub fn analytics(corpus: &Corpus) -> Analytics {
    let topics = most_common(
        corpus.iter().map(|a| {
            if a.topic.trim().is_empty() {
                UNKNOWN_TOPIC.to_string()
            } else {
                a.topic.clone()
            }
        }),
        TOP_TOPICS,
    );

    let mut timeline = BTreeMap::new();
    for d in corpus.iter().filter_map(|a| a.date_parsed) {
        *timeline.entry(period_key(d)).or_insert(0) += 1;
    }

    let keyword_source = if corpus.iter().any(|a| !a.tags.trim().is_empty()) {
        KeywordSource::Tags
    } else {
        KeywordSource::TitleText
    };
    let top_tags = match keyword_source {
        KeywordSource::Tags => most_common(corpus.iter().flat_map(|a| tag_tokens(&a.tags)), TOP_TAGS),
        KeywordSource::TitleText => {
            let titles = corpus.iter().map(|a| a.title.as_str());
            let texts = corpus.iter().map(|a| a.text.as_str());
            most_common(titles.chain(texts).flat_map(text_tokens), TOP_TAGS)
        }
    };

    Analytics {
        topics,
        timeline,
        top_tags,
        keyword_source,
    }
}

/// Tokens of a tag field: separator-split, lowercased, at least three chars.
pub fn tag_tokens(tags: &str) -> Vec<String> {
    TAG_SPLIT
        .split(tags)
        .map(|p| p.trim().to_lowercase())
        .filter(|p| p.chars().count() >= 3)
        .collect()
}

/// Alphabetic keyword tokens of free text, stopwords removed.
pub fn text_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    ALPHA_RUN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !KEYWORD_STOPWORDS.contains(*w))
        .map(str::to_string)
        .collect()
}

/// Top `n` by count descending; equal counts keep first-seen order.
fn most_common(items: impl Iterator<Item = String>, n: usize) -> RankedCounts {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        let c = counts.entry(item.clone()).or_insert(0);
        if *c == 0 {
            order.push(item);
        }
        *c += 1;
    }
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|k| {
            let n = counts[&k];
            (k, n)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    RankedCounts(ranked)
}
