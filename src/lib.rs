//! # News Lens
//!
//! Content-based search and related-article recommendation over a static
//! corpus of news articles.
//!
//! The corpus is read once from a CSV file, normalized, and indexed with
//! TF-IDF. After that everything is read-only: search, related-article
//! ranking and analytics are pure queries against one shared
//! [`NewsEngine`](news_lens_core::engine::NewsEngine).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌─────────────┐
//! │ CSV file │──▶│   Corpus    │──▶│ VectorIndex │
//! └──────────┘   │ (normalize) │   │  (TF-IDF)   │
//!                └──────┬──────┘   └──────┬──────┘
//!                       │                 │
//!                       ▼                 ▼
//!                 ┌───────────┐    ┌──────────────────┐
//!                 │ analytics │    │ search/recommend │
//!                 └─────┬─────┘    └────────┬─────────┘
//!                       └────────┬──────────┘
//!                       ┌────────┴────────┐
//!                       ▼                 ▼
//!                 ┌──────────┐       ┌──────────┐
//!                 │   CLI    │       │   HTTP   │
//!                 │ (nlens)  │       │  (JSON)  │
//!                 └──────────┘       └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and `NEWS_*` overrides |
//! | [`loader`] | CSV data source and engine construction |
//! | [`get`] | Article lookup |
//! | [`list`] | Listing and topic views |
//! | [`search`] | Search with newest-first presentation |
//! | [`related`] | Related-article cards |
//! | [`report`] | Analytics output |
//! | [`stats`] | Corpus overview |
//! | [`server`] | JSON HTTP API |

pub mod config;
pub mod get;
pub mod list;
pub mod loader;
pub mod related;
pub mod report;
pub mod search;
pub mod server;
pub mod stats;
