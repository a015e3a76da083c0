//! Corpus construction and read-only views.
//!
//! [`Corpus::from_records`] is the single normalization pipeline: every raw
//! row becomes exactly one [`Article`], in input order, with ids assigned by
//! position. Nothing in the corpus changes after construction.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::bail;
use serde::Serialize;

use crate::date::parse_date;
use crate::models::{Article, RawRecord};
use crate::topic::TopicKey;

/// Normalization settings applied while building a corpus.
#[derive(Debug, Clone, Copy)]
pub struct CorpusOptions {
    /// `text` is cut to this many characters.
    pub max_text_len: usize,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self { max_text_len: 2000 }
    }
}

/// Counts of rows that needed a fallback value during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub rows: usize,
    pub undated: usize,
    pub default_topic: usize,
    pub truncated_text: usize,
}

/// Immutable, id-addressed collection of normalized articles.
#[derive(Debug, Clone)]
pub struct Corpus {
    articles: Vec<Article>,
    report: NormalizationReport,
}

/// Sort orders for listing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleSort {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl ArticleSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleSort::DateDesc => "date_desc",
            ArticleSort::DateAsc => "date_asc",
            ArticleSort::TitleAsc => "title_asc",
            ArticleSort::TitleDesc => "title_desc",
        }
    }

    /// Parses a sort name, falling back to [`ArticleSort::DateDesc`].
    pub fn parse_lenient(s: &str) -> ArticleSort {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for ArticleSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "date_desc" => Ok(ArticleSort::DateDesc),
            "date_asc" => Ok(ArticleSort::DateAsc),
            "title_asc" => Ok(ArticleSort::TitleAsc),
            "title_desc" => Ok(ArticleSort::TitleDesc),
            other => bail!(
                "Unknown sort order: {}. Use date_desc, date_asc, title_asc, or title_desc.",
                other
            ),
        }
    }
}

impl Corpus {
    /// Normalize raw rows into a corpus.
    ///
    /// An empty input produces the single placeholder article so that every
    /// downstream component sees at least one row.
    pub fn from_records(records: Vec<RawRecord>, opts: CorpusOptions) -> Corpus {
        if records.is_empty() {
            return Corpus::placeholder();
        }

        let mut report = NormalizationReport::default();
        let articles: Vec<Article> = records
            .into_iter()
            .enumerate()
            .map(|(id, raw)| normalize(id, raw, opts, &mut report))
            .collect();
        report.rows = articles.len();

        Corpus { articles, report }
    }

    /// The welcome article used when no data source is available.
    pub fn placeholder() -> Corpus {
        let raw = RawRecord {
            url: None,
            title: Some("Welcome to News Lens".to_string()),
            text: Some(
                "Put your dataset at data/news.csv with columns url,title,text,topic,tags,date"
                    .to_string(),
            ),
            topic: Some("welcome".to_string()),
            tags: Some("intro,portal".to_string()),
            date: Some("2024-01-01".to_string()),
        };
        let mut report = NormalizationReport::default();
        let article = normalize(0, raw, CorpusOptions::default(), &mut report);
        report.rows = 1;
        Corpus {
            articles: vec![article],
            report,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Article> {
        self.articles.get(id)
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    pub fn report(&self) -> NormalizationReport {
        self.report
    }

    /// Distinct raw topics (trimmed, non-empty), sorted ascending.
    pub fn topics(&self) -> Vec<String> {
        self.articles
            .iter()
            .map(|a| a.topic.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All articles in the requested order. Ties keep corpus order.
    pub fn listing(&self, sort: ArticleSort) -> Vec<&Article> {
        let mut out: Vec<&Article> = self.articles.iter().collect();
        sort_articles(&mut out, sort);
        out
    }

    /// Articles whose raw topic matches `topic` case-insensitively, in `sort`
    /// order. Ties keep corpus order.
    pub fn by_topic(&self, topic: &str, sort: ArticleSort) -> Vec<&Article> {
        let wanted = topic.trim().to_lowercase();
        let mut out: Vec<&Article> = self
            .articles
            .iter()
            .filter(|a| a.topic_normalized() == wanted)
            .collect();
        sort_articles(&mut out, sort);
        out
    }
}

/// Stable in-place sort. Undated articles go last in both date orders.
pub fn sort_articles(articles: &mut [&Article], sort: ArticleSort) {
    match sort {
        ArticleSort::DateDesc => articles.sort_by(|a, b| cmp_dates(a, b, true)),
        ArticleSort::DateAsc => articles.sort_by(|a, b| cmp_dates(a, b, false)),
        ArticleSort::TitleAsc => articles.sort_by(|a, b| a.title.cmp(&b.title)),
        ArticleSort::TitleDesc => articles.sort_by(|a, b| b.title.cmp(&a.title)),
    }
}

fn cmp_dates(a: &Article, b: &Article, descending: bool) -> Ordering {
    match (a.date_parsed, b.date_parsed) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn normalize(id: usize, raw: RawRecord, opts: CorpusOptions, report: &mut NormalizationReport) -> Article {
    let title = raw.title.unwrap_or_default();
    let tags = raw.tags.unwrap_or_default();
    let topic = raw.topic.unwrap_or_default();
    let url = raw.url.unwrap_or_default();
    let date_raw = raw.date.unwrap_or_default();

    let full_text = raw.text.unwrap_or_default();
    let text = match full_text.char_indices().nth(opts.max_text_len) {
        Some((cut, _)) => {
            report.truncated_text += 1;
            full_text[..cut].to_string()
        }
        None => full_text,
    };

    let date_parsed = parse_date(&date_raw);
    if date_parsed.is_none() {
        report.undated += 1;
    }

    let topic_key = TopicKey::sanitize(Some(&topic));
    if topic_key == TopicKey::Default {
        report.default_topic += 1;
    }

    let content = format!("{} {} {} {}", title, text, tags, topic);

    Article {
        id,
        title,
        text,
        tags,
        topic,
        url,
        date_raw,
        date_parsed,
        topic_key,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, topic: &str, date: &str) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            topic: Some(topic.to_string()),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        let corpus = Corpus::from_records(Vec::new(), CorpusOptions::default());
        assert_eq!(corpus.len(), 1);
        let a = corpus.get(0).unwrap();
        assert_eq!(a.id, 0);
        assert_eq!(a.topic, "welcome");
        assert_eq!(a.topic_key, TopicKey::Default);
        assert!(a.date_parsed.is_some());
    }

    #[test]
    fn test_ids_are_positional() {
        let corpus = Corpus::from_records(
            vec![record("a", "", ""), record("b", "", ""), record("c", "", "")],
            CorpusOptions::default(),
        );
        for (i, a) in corpus.iter().enumerate() {
            assert_eq!(a.id, i);
        }
        assert!(corpus.get(3).is_none());
    }

    #[test]
    fn test_missing_fields_become_empty_strings() {
        let corpus = Corpus::from_records(vec![RawRecord::default()], CorpusOptions::default());
        let a = corpus.get(0).unwrap();
        assert_eq!(a.title, "");
        assert_eq!(a.url, "");
        assert_eq!(a.content, "   ");
        assert_eq!(a.topic_key, TopicKey::Default);
        assert_eq!(a.date_parsed, None);
        assert_eq!(corpus.report().undated, 1);
    }

    #[test]
    fn test_content_concatenation_order() {
        let raw = RawRecord {
            title: Some("T".into()),
            text: Some("body".into()),
            tags: Some("x,y".into()),
            topic: Some("Sport".into()),
            ..Default::default()
        };
        let corpus = Corpus::from_records(vec![raw], CorpusOptions::default());
        assert_eq!(corpus.get(0).unwrap().content, "T body x,y Sport");
    }

    #[test]
    fn test_text_truncated_by_chars() {
        let raw = RawRecord {
            text: Some("ПриветWorld".into()),
            ..Default::default()
        };
        let corpus = Corpus::from_records(vec![raw], CorpusOptions { max_text_len: 6 });
        assert_eq!(corpus.get(0).unwrap().text, "Привет");
        assert_eq!(corpus.report().truncated_text, 1);
    }

    #[test]
    fn test_topics_distinct_sorted() {
        let corpus = Corpus::from_records(
            vec![
                record("a", "Sport", ""),
                record("b", " World ", ""),
                record("c", "Sport", ""),
                record("d", "", ""),
            ],
            CorpusOptions::default(),
        );
        assert_eq!(corpus.topics(), vec!["Sport".to_string(), "World".to_string()]);
    }

    #[test]
    fn test_listing_date_desc_puts_undated_last() {
        let corpus = Corpus::from_records(
            vec![
                record("old", "", "2020-01-01"),
                record("none", "", "garbage"),
                record("new", "", "2024-01-01"),
            ],
            CorpusOptions::default(),
        );
        let titles: Vec<&str> = corpus
            .listing(ArticleSort::DateDesc)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["new", "old", "none"]);

        let titles: Vec<&str> = corpus
            .listing(ArticleSort::DateAsc)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["old", "new", "none"]);
    }

    #[test]
    fn test_listing_by_title() {
        let corpus = Corpus::from_records(
            vec![record("b", "", ""), record("a", "", ""), record("c", "", "")],
            CorpusOptions::default(),
        );
        let asc: Vec<usize> = corpus.listing(ArticleSort::TitleAsc).iter().map(|a| a.id).collect();
        assert_eq!(asc, vec![1, 0, 2]);
        let desc: Vec<usize> = corpus.listing(ArticleSort::TitleDesc).iter().map(|a| a.id).collect();
        assert_eq!(desc, vec![2, 0, 1]);
    }

    #[test]
    fn test_by_topic_case_insensitive() {
        let corpus = Corpus::from_records(
            vec![record("a", "Sport", "2020-01-01"), record("b", "sport ", "2021-01-01"), record("c", "World", "")],
            CorpusOptions::default(),
        );
        let ids: Vec<usize> = corpus.by_topic("SPORT", ArticleSort::DateDesc).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("title_asc".parse::<ArticleSort>().unwrap(), ArticleSort::TitleAsc);
        assert!("sideways".parse::<ArticleSort>().is_err());
        assert_eq!(ArticleSort::parse_lenient("sideways"), ArticleSort::DateDesc);
    }

    #[test]
    fn test_by_topic_honors_sort() {
        let corpus = Corpus::from_records(
            vec![
                record("b", "Sport", "2021-01-01"),
                record("a", "Sport", "2020-01-01"),
                record("c", "World", "2022-01-01"),
                record("a", "sport", "2019-01-01"),
            ],
            CorpusOptions::default(),
        );
        let ids = |sort| -> Vec<usize> { corpus.by_topic("sport", sort).iter().map(|a| a.id).collect() };
        assert_eq!(ids(ArticleSort::DateDesc), vec![0, 1, 3]);
        assert_eq!(ids(ArticleSort::DateAsc), vec![3, 1, 0]);
        assert_eq!(ids(ArticleSort::TitleAsc), vec![1, 3, 0]);
        assert_eq!(ids(ArticleSort::TitleDesc), vec![0, 1, 3]);
    }
}
