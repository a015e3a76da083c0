//! # News Lens Core
//!
//! Pure, I/O-free logic for News Lens: article models, normalization
//! cascades, the TF-IDF vector index, search, related-article ranking and
//! corpus analytics.
//!
//! Everything here is built once and then only read. A [`engine::NewsEngine`]
//! bundles the immutable corpus and index and is safe to share across
//! threads without locking.
//!
//! ```text
//! RawRecord ──▶ Corpus ──▶ VectorIndex ──▶ search / recommend
//!                  │
//!                  └──────▶ analytics
//! ```

pub mod analytics;
pub mod corpus;
pub mod date;
pub mod engine;
pub mod models;
pub mod recommend;
pub mod search;
pub mod tfidf;
pub mod topic;
