//! Core data models shared by every component.
//!
//! A [`RawRecord`] is one row of the tabular input with each known column
//! resolved once into an explicit optional field. Normalization turns it
//! into an [`Article`], the immutable unit the index, search, recommendation
//! and analytics components all read.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::topic::TopicKey;

/// Column names recognized in the tabular input. Any subset may be present.
pub const KNOWN_COLUMNS: [&str; 6] = ["url", "title", "text", "topic", "tags", "date"];

/// One raw input row before normalization.
///
/// `None` means the column was absent or the cell was missing; both are
/// treated as the empty string downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub url: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub topic: Option<String>,
    pub tags: Option<String>,
    pub date: Option<String>,
}

impl RawRecord {
    /// Sets a field by its column name. Unknown columns are ignored.
    pub fn set(&mut self, column: &str, value: String) {
        match column {
            "url" => self.url = Some(value),
            "title" => self.title = Some(value),
            "text" => self.text = Some(value),
            "topic" => self.topic = Some(value),
            "tags" => self.tags = Some(value),
            "date" => self.date = Some(value),
            _ => {}
        }
    }
}

/// A normalized news article.
///
/// `id` is the zero-based position in the corpus and doubles as the row
/// index in the vector index.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: usize,
    pub title: String,
    pub text: String,
    pub tags: String,
    pub topic: String,
    pub url: String,
    /// Date exactly as it appeared in the source.
    pub date_raw: String,
    /// Best-effort parse of `date_raw`; `None` when every tier failed.
    pub date_parsed: Option<NaiveDateTime>,
    pub topic_key: TopicKey,
    /// `title text tags topic`, the only input to vectorization.
    #[serde(skip_serializing)]
    pub content: String,
}

impl Article {
    /// Raw topic trimmed and lowercased, used for topic-affinity matching.
    pub fn topic_normalized(&self) -> String {
        self.topic.trim().to_lowercase()
    }

    /// Title suitable for a card, truncated to `max_chars` characters, or
    /// `"Article <id>"` when the title is empty.
    pub fn card_title(&self, max_chars: usize) -> String {
        let t: String = self.title.chars().take(max_chars).collect();
        if t.is_empty() {
            format!("Article {}", self.id)
        } else {
            t
        }
    }
}
