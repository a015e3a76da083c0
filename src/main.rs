//! # News Lens CLI (`nlens`)
//!
//! Loads the configured article corpus, builds the TF-IDF index, and then
//! either answers a single query or serves the JSON API.
//!
//! ## Usage
//!
//! ```bash
//! nlens --config ./config/nlens.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `nlens stats` | Corpus and index overview |
//! | `nlens list` | List articles (sortable, filterable by topic) |
//! | `nlens topics` | Distinct topics |
//! | `nlens get <id>` | Print one article |
//! | `nlens related <id>` | Related articles |
//! | `nlens search "<query>"` | Substring search with similarity fallback |
//! | `nlens analytics` | Topic counts, monthly timeline, top keywords |
//! | `nlens serve` | Start the HTTP server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use news_lens::{config, get, list, loader, related, report, search, server, stats};

/// News Lens CLI — search and related-article recommendation over a news corpus.
#[derive(Parser)]
#[command(
    name = "nlens",
    about = "News Lens — search and related-article recommendation over a news corpus",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/nlens.toml`; built-in defaults are used when
    /// that file does not exist. A path given here must exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show corpus and index statistics.
    Stats,

    /// List articles.
    List {
        /// Sort order: `date_desc`, `date_asc`, `title_asc`, or `title_desc`.
        #[arg(long, default_value = "date_desc")]
        sort: String,

        /// Only articles with this topic (case-insensitive), in `--sort` order.
        #[arg(long)]
        topic: Option<String>,

        /// Maximum number of articles to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List distinct topics.
    Topics,

    /// Print a full article by id.
    Get {
        /// Article id.
        id: usize,
    },

    /// Show articles related to the given one.
    Related {
        /// Article id.
        id: usize,

        /// Number of related articles (defaults to `retrieval.related_top_k`).
        #[arg(long)]
        top_k: Option<usize>,

        /// Print the score breakdown for each result.
        #[arg(long)]
        explain: bool,
    },

    /// Search articles.
    ///
    /// Matches the query as a case-insensitive substring of title, text or
    /// tags; falls back to TF-IDF similarity when nothing matches.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print corpus analytics.
    Analytics {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::resolve_config(cli.config.as_deref())?;
    let engine = loader::build_engine(&cfg)?;

    match cli.command {
        Commands::Stats => stats::run_stats(&cfg, &engine)?,
        Commands::List { sort, topic, limit } => {
            list::run_list(&engine, &sort, topic.as_deref(), limit)?;
        }
        Commands::Topics => list::run_topics(&engine)?,
        Commands::Get { id } => get::run_get(&engine, id)?,
        Commands::Related { id, top_k, explain } => {
            related::run_related(&engine, id, top_k, explain)?;
        }
        Commands::Search { query, limit } => search::run_search(&engine, &query, limit)?,
        Commands::Analytics { json } => report::run_analytics(&engine, json)?,
        Commands::Serve => server::run_server(&cfg, engine).await?,
    }

    Ok(())
}
