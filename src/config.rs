//! TOML configuration.
//!
//! Every section and key is optional; missing values take the defaults
//! below. After the file is read, environment overrides are applied and the
//! result is validated. Validation failures are fatal at startup.
//!
//! | Key | Default | Env override |
//! |-----|---------|--------------|
//! | `data.path` | `data/news.csv` | `NEWS_CSV_PATH` |
//! | `data.max_rows` | `50000` | `NEWS_NROWS` |
//! | `data.max_text_len` | `2000` | `NEWS_MAX_TEXT` |
//! | `index.max_features` | `2000` | `NEWS_TFIDF_FEATS` |
//! | `retrieval.related_top_k` | `6` | |
//! | `retrieval.search_fallback_limit` | `100` | |
//! | `retrieval.topic_boost` | `0.05` | |
//! | `retrieval.decay_days` | `365.0` | |
//! | `server.bind` | `127.0.0.1:5000` | |

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use news_lens_core::corpus::CorpusOptions;
use news_lens_core::engine::EngineParams;
use news_lens_core::recommend::RecommendParams;
use news_lens_core::tfidf::IndexOptions;

/// Config path used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./config/nlens.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            max_rows: default_max_rows(),
            max_text_len: default_max_text_len(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/news.csv")
}
fn default_max_rows() -> usize {
    50_000
}
fn default_max_text_len() -> usize {
    2000
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
        }
    }
}

fn default_max_features() -> usize {
    2000
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_related_top_k")]
    pub related_top_k: usize,
    #[serde(default = "default_search_fallback_limit")]
    pub search_fallback_limit: usize,
    #[serde(default = "default_topic_boost")]
    pub topic_boost: f64,
    #[serde(default = "default_decay_days")]
    pub decay_days: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            related_top_k: default_related_top_k(),
            search_fallback_limit: default_search_fallback_limit(),
            topic_boost: default_topic_boost(),
            decay_days: default_decay_days(),
        }
    }
}

fn default_related_top_k() -> usize {
    6
}
fn default_search_fallback_limit() -> usize {
    100
}
fn default_topic_boost() -> f64 {
    0.05
}
fn default_decay_days() -> f64 {
    365.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl Config {
    pub fn corpus_options(&self) -> CorpusOptions {
        CorpusOptions {
            max_text_len: self.data.max_text_len,
        }
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            max_features: self.index.max_features,
        }
    }

    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            recommend: RecommendParams {
                top_k: self.retrieval.related_top_k,
                topic_boost: self.retrieval.topic_boost,
                decay_days: self.retrieval.decay_days,
            },
            search_fallback_limit: self.retrieval.search_fallback_limit,
        }
    }
}

/// Read, parse, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    finish(config)
}

/// Like [`load_config`], but a missing file at the default location falls
/// back to built-in defaults. An explicitly requested file must exist.
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_config(default)
            } else {
                finish(Config::default())
            }
        }
    }
}

fn finish(mut config: Config) -> Result<Config> {
    apply_env_overrides(&mut config, |k| std::env::var(k).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Apply `NEWS_*` overrides read through `lookup`.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(p) = lookup("NEWS_CSV_PATH") {
        config.data.path = PathBuf::from(p);
    }
    if let Some(v) = lookup("NEWS_NROWS") {
        config.data.max_rows = parse_env("NEWS_NROWS", &v)?;
    }
    if let Some(v) = lookup("NEWS_MAX_TEXT") {
        config.data.max_text_len = parse_env("NEWS_MAX_TEXT", &v)?;
    }
    if let Some(v) = lookup("NEWS_TFIDF_FEATS") {
        config.index.max_features = parse_env("NEWS_TFIDF_FEATS", &v)?;
    }
    Ok(())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", key, value))
}

pub fn validate(config: &Config) -> Result<()> {
    if config.data.path.as_os_str().is_empty() {
        bail!("data.path must not be empty");
    }
    if config.data.max_rows == 0 {
        bail!("data.max_rows must be >= 1");
    }
    if config.data.max_text_len == 0 {
        bail!("data.max_text_len must be >= 1");
    }
    if config.index.max_features == 0 {
        bail!("index.max_features must be >= 1");
    }
    if config.retrieval.related_top_k == 0 {
        bail!("retrieval.related_top_k must be >= 1");
    }
    if config.retrieval.search_fallback_limit == 0 {
        bail!("retrieval.search_fallback_limit must be >= 1");
    }
    if !(0.0..1.0).contains(&config.retrieval.topic_boost) {
        bail!("retrieval.topic_boost must be in [0.0, 1.0)");
    }
    if !config.retrieval.decay_days.is_finite() || config.retrieval.decay_days <= 0.0 {
        bail!("retrieval.decay_days must be a finite value > 0");
    }
    Ok(())
}
