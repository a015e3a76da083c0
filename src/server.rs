//! JSON HTTP API.
//!
//! Serves the read-only engine built at startup. Every handler is a pure
//! read over the shared [`NewsEngine`], so requests run concurrently without
//! locking.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Health check (returns version) |
//! | `GET` | `/articles` | Paginated listing (`sort`, `topic`, `page`, `per_page`) |
//! | `GET` | `/articles/{id}` | One article |
//! | `GET` | `/articles/{id}/related` | Related-article cards (`k`, `explain`) |
//! | `GET` | `/search` | Search (`q`, `page`, `per_page`) |
//! | `GET` | `/topics` | Distinct raw topics |
//! | `GET` | `/analytics` | Topic counts, monthly timeline, top keywords |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "article not found: 42" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! Numeric query parameters that fail to parse fall back to their defaults
//! rather than rejecting the request.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use news_lens_core::analytics::Analytics;
use news_lens_core::corpus::ArticleSort;
use news_lens_core::engine::NewsEngine;
use news_lens_core::models::Article;

use crate::config::Config;
use crate::related::{related_cards, RelatedCard};
use crate::search::search_articles;

/// Page size when `per_page` is absent or invalid.
pub const DEFAULT_PER_PAGE: usize = 24;
/// Upper bound on `per_page`.
pub const MAX_PER_PAGE: usize = 500;

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    engine: Arc<NewsEngine>,
}

/// Starts the HTTP server on `[server].bind` and runs until the process exits.
pub async fn run_server(config: &Config, engine: NewsEngine) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
        engine: Arc::new(engine),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind = %bind_addr, "news lens listening");
    println!("News Lens listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/articles", get(handle_list))
        .route("/articles/{id}", get(handle_article))
        .route("/articles/{id}/related", get(handle_related))
        .route("/search", get(handle_search))
        .route("/topics", get(handle_topics))
        .route("/analytics", get(handle_analytics))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Parses an article id path segment. Anything that is not a non-negative
/// integer cannot name an article, so it is reported as not found.
fn parse_id(raw: &str) -> Result<usize, AppError> {
    raw.parse()
        .map_err(|_| not_found(format!("article not found: {}", raw)))
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

// ============ Pagination ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct Pagination {
    page: usize,
    per_page: usize,
    total: usize,
    pages: usize,
    has_prev: bool,
    has_next: bool,
}

impl Pagination {
    /// `page` is clamped to `[1, pages]`; an empty result still has one page.
    fn new(page: usize, per_page: usize, total: usize) -> Pagination {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let pages = if total > 0 { total.div_ceil(per_page) } else { 1 };
        let page = page.clamp(1, pages);
        Pagination {
            page,
            per_page,
            total,
            pages,
            has_prev: page > 1,
            has_next: page < pages,
        }
    }

    fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}

fn paginate(page: Option<&str>, per_page: Option<&str>, total: usize) -> Pagination {
    Pagination::new(
        parse_or(page, 1),
        parse_or(per_page, DEFAULT_PER_PAGE),
        total,
    )
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /articles ============

#[derive(Deserialize)]
struct ListParams {
    sort: Option<String>,
    topic: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

#[derive(Serialize)]
struct ListResponse<'a> {
    sort: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    pagination: Pagination,
    articles: &'a [&'a Article],
}

async fn handle_list(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let sort = ArticleSort::parse_lenient(params.sort.as_deref().unwrap_or(""));
    let articles = match params.topic.as_deref() {
        Some(t) => state.engine.by_topic(t, sort),
        None => state.engine.listing(sort),
    };
    let pagination = paginate(params.page.as_deref(), params.per_page.as_deref(), articles.len());

    Json(ListResponse {
        sort: sort.as_str(),
        topic: params.topic.clone(),
        pagination,
        articles: pagination.slice(&articles),
    })
    .into_response()
}

// ============ GET /articles/{id} ============

async fn handle_article(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let article = state
        .engine
        .article(id)
        .ok_or_else(|| not_found(format!("article not found: {}", id)))?;
    Ok(Json(article).into_response())
}

// ============ GET /articles/{id}/related ============

#[derive(Deserialize)]
struct RelatedParams {
    k: Option<String>,
    explain: Option<String>,
}

#[derive(Serialize)]
struct RelatedResponse {
    id: usize,
    related: Vec<RelatedCard>,
}

async fn handle_related(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<RelatedResponse>, AppError> {
    let id = parse_id(&id)?;
    let k = parse_or(params.k.as_deref(), state.config.retrieval.related_top_k);
    if k == 0 {
        return Err(bad_request("k must be >= 1"));
    }
    let explain = matches!(params.explain.as_deref(), Some("1" | "true" | "yes"));

    let related = related_cards(&state.engine, id, Some(k), explain)
        .map_err(|e| not_found(e.to_string()))?;
    Ok(Json(RelatedResponse { id, related }))
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    query: String,
    mode: &'static str,
    total: usize,
    pagination: Pagination,
    articles: &'a [&'a Article],
}

async fn handle_search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.as_deref().unwrap_or("").trim().to_string();
    let results = search_articles(&state.engine, &query);
    let pagination = paginate(
        params.page.as_deref(),
        params.per_page.as_deref(),
        results.articles.len(),
    );

    Json(SearchResponse {
        query,
        mode: results.mode.as_str(),
        total: results.articles.len(),
        pagination,
        articles: pagination.slice(&results.articles),
    })
    .into_response()
}

// ============ GET /topics ============

#[derive(Serialize)]
struct TopicsResponse {
    topics: Vec<String>,
}

async fn handle_topics(State(state): State<AppState>) -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: state.engine.topics(),
    })
}

// ============ GET /analytics ============

async fn handle_analytics(State(state): State<AppState>) -> Json<Analytics> {
    Json(state.engine.analytics())
}
