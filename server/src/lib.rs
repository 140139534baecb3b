use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use docsearch_core::corpus::load_directory;
use docsearch_core::{DocId, RankingMethod, SearchEngine};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Content,
    #[default]
    Ranked,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub field: SearchField,
    #[serde(default)]
    pub method: RankingMethod,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    /// Present for ranked searches only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub title: String,
    pub snippet: Option<String>,
}

#[derive(Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}

/// The engine is written only through `POST /documents`; every other route takes a read lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SearchEngine>>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(engine: SearchEngine, admin_token: Option<String>) -> Self {
        Self { engine: Arc::new(RwLock::new(engine)), admin_token }
    }
}

pub fn build_app(corpus_dir: &std::path::Path) -> Result<Router> {
    let mut engine = SearchEngine::new();
    load_directory(&mut engine, corpus_dir)?;
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    Ok(router(AppState::new(engine, admin_token)))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/documents", post(add_documents))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let engine = state.engine.read();

    let hits: Vec<(DocId, Option<f64>)> = match params.field {
        SearchField::Title => engine.search_by_title(&params.q).into_iter().map(|id| (id, None)).collect(),
        SearchField::Content => engine.search_by_content(&params.q).into_iter().map(|id| (id, None)).collect(),
        SearchField::Ranked => engine
            .rank(&params.q, params.method)
            .into_iter()
            .map(|(id, score)| (id, Some(score)))
            .collect(),
    };
    let total_hits = hits.len();
    let k = params.k.clamp(1, 100);

    // Capture raw query words for highlighting
    let raw_terms: Vec<String> = params.q.split_whitespace().map(|s| s.to_string()).collect();
    let results = hits
        .into_iter()
        .take(k)
        .filter_map(|(doc_id, score)| {
            let doc = engine.get_document(doc_id)?;
            let snippet = snippet_from_text(&doc.content, &raw_terms);
            Some(SearchHit { doc_id, score, title: doc.title.clone(), snippet })
        })
        .collect();

    Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), total_hits, results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let engine = state.engine.read();
    match engine.get_document(doc_id) {
        Some(doc) => Ok(Json(serde_json::json!({
            "doc_id": doc.id,
            "title": doc.title,
            "text": doc.content,
            "length": doc.length,
        }))),
        None => Err((StatusCode::NOT_FOUND, format!("document {doc_id} not found"))),
    }
}

async fn add_documents(State(state): State<AppState>, headers: HeaderMap, Json(docs): Json<Vec<NewDocument>>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let mut engine = state.engine.write();
    let mut ids = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = engine
            .add_document(&doc.title, &doc.content)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        ids.push(id);
    }
    tracing::info!(added = ids.len(), num_docs = engine.len(), "documents added");
    Ok(Json(serde_json::json!({ "ids": ids })))
}

fn snippet_from_text(text: &str, raw_terms: &[String]) -> Option<String> {
    if text.trim().is_empty() { return None; }
    // find first match (case-insensitive) of any raw term
    let lower = text.to_lowercase();
    let first_idx = raw_terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .find_map(|t| lower.find(&t.to_lowercase()))
        .filter(|&idx| lower.len() == text.len() && idx < text.len());
    let snippet = match first_idx {
        Some(idx) => {
            let start = char_boundary(text, idx.saturating_sub(100));
            let end = char_boundary(text, (idx + 200).min(text.len()));
            text[start..end].to_string()
        }
        None => text.chars().take(200).collect(),
    };
    Some(highlight_terms(&snippet, raw_terms))
}

/// Largest char boundary at or below `idx`.
fn char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Wraps every query word in `<em>` with a single pass, so later words never match inside earlier tags.
fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut words: Vec<&str> = terms.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
    if words.is_empty() {
        return snippet.to_string();
    }
    // Longest first so a word wins over its own prefix.
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();
    let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
    let Ok(pat) = regex::RegexBuilder::new(&alternation).case_insensitive(true).build() else {
        return snippet.to_string();
    };
    pat.replace_all(snippet, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).into_owned()
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
