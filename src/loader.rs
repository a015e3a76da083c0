//! CSV data source and engine construction.
//!
//! The input is a headed CSV with any subset of the columns
//! `url,title,text,topic,tags,date`. Extra columns are ignored and short
//! rows simply leave the trailing fields missing. Each row is resolved once
//! into a [`RawRecord`].
//!
//! A path that does not exist is not an error: the engine is built over the
//! placeholder corpus instead. A path that exists but cannot be read as CSV
//! is fatal.

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use news_lens_core::corpus::Corpus;
use news_lens_core::engine::NewsEngine;
use news_lens_core::models::{RawRecord, KNOWN_COLUMNS};

use crate::config::Config;

/// Read up to `max_rows` records. `Ok(None)` when `path` does not exist.
pub fn load_records(path: &Path, max_rows: usize) -> Result<Option<Vec<RawRecord>>> {
    if !path.exists() {
        return Ok(None);
    }
    if path.is_dir() {
        bail!("Data source is a directory, expected a CSV file: {}", path.display());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open data source: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .clone();
    let columns: Vec<Option<&str>> = headers
        .iter()
        .map(|h| {
            let h = h.trim_start_matches('\u{feff}');
            KNOWN_COLUMNS.iter().copied().find(|c| *c == h)
        })
        .collect();

    let mut records = Vec::new();
    for (line, row) in reader.records().take(max_rows).enumerate() {
        let row = row.with_context(|| format!("Malformed CSV row {} in {}", line + 2, path.display()))?;
        let mut rec = RawRecord::default();
        for (value, column) in row.iter().zip(&columns) {
            if let Some(column) = column {
                rec.set(column, value.to_string());
            }
        }
        records.push(rec);
    }

    Ok(Some(records))
}

/// Load the configured data source, normalize it and build the index.
pub fn build_engine(config: &Config) -> Result<NewsEngine> {
    let started = Instant::now();
    let path = &config.data.path;

    let corpus = match load_records(path, config.data.max_rows)? {
        Some(records) => {
            info!(path = %path.display(), rows = records.len(), "loaded data source");
            Corpus::from_records(records, config.corpus_options())
        }
        None => {
            warn!(path = %path.display(), "data source not found, serving placeholder article");
            Corpus::placeholder()
        }
    };

    let report = corpus.report();
    debug!(
        undated = report.undated,
        default_topic = report.default_topic,
        truncated_text = report.truncated_text,
        "normalization fallbacks"
    );

    let engine = NewsEngine::new(corpus, config.index_options(), config.engine_params());
    info!(
        articles = engine.corpus().len(),
        vocabulary = engine.index().vocabulary_size(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "engine ready"
    );
    Ok(engine)
}
