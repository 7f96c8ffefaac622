/// HTTP surface of the content API.
///
/// Routes:
/// - `GET /`: liveness text
/// - `GET /api/roadmaps`: role and skill summaries
/// - `GET /api/roadmaps/{id}`: roadmap document or 404
/// - `GET /api/skills/{id}`: skill document or 404
/// - `GET /api/projects`: project catalogue, optionally filtered by `q` and `category`
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::cache::ContentCache;
use crate::content::{ContentStore, DocumentKind};
use crate::error::AppError;
use crate::search::ProjectSearch;

pub const LIVENESS_TEXT: &str = "API is running";

#[derive(Clone)]
pub struct ApiState {
    content: Arc<ContentStore>,
    cache: Arc<ContentCache>,
    search: Arc<ProjectSearch>,
}

impl ApiState {
    pub fn new(content: Arc<ContentStore>, cache: Arc<ContentCache>) -> Self {
        let search = Arc::new(ProjectSearch::new(Arc::clone(&content), Arc::clone(&cache)));
        Self {
            content,
            cache,
            search,
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/api/roadmaps", get(list_roadmaps))
        .route("/api/roadmaps/{id}", get(get_roadmap))
        .route("/api/skills/{id}", get(get_skill))
        .route("/api/projects", get(list_projects))
        .layer(middleware::from_fn(allow_any_origin))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(req).await;
    info!(
        %method,
        path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn allow_any_origin(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn list_roadmaps(State(state): State<ApiState>) -> Result<Json<Value>, AppError> {
    if let Some(cached) = state.cache.get_summaries().await {
        return Ok(Json(cached));
    }
    let summaries = state.content.summaries().await?;
    state.cache.set_summaries(&summaries).await;
    Ok(Json(summaries))
}

async fn get_roadmap(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    document(&state, DocumentKind::Roadmap, &id).await.map(Json)
}

async fn get_skill(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    document(&state, DocumentKind::Skill, &id).await.map(Json)
}

async fn document(state: &ApiState, kind: DocumentKind, id: &str) -> Result<Value, AppError> {
    if let Some(cached) = state.cache.get_document(kind, id).await {
        return Ok(cached);
    }
    let doc = state.content.document(kind, id).await?;
    state.cache.set_document(kind, id, &doc).await;
    Ok(doc)
}

#[derive(Debug, Deserialize)]
struct ProjectParams {
    q: Option<String>,
    category: Option<String>,
}

async fn list_projects(
    State(state): State<ApiState>,
    Query(params): Query<ProjectParams>,
) -> Result<Json<Value>, AppError> {
    let query = params.q.unwrap_or_default();
    let category = params.category.unwrap_or_default();

    if query.trim().is_empty() && matches!(category.trim(), "" | "all") {
        if let Some(cached) = state.cache.get_projects().await {
            return Ok(Json(cached));
        }
        let projects = state.content.projects_raw().await?;
        state.cache.set_projects(&projects).await;
        return Ok(Json(projects));
    }

    let results = state.search.search(&query, &category).await?;
    let value = serde_json::to_value(results).map_err(roadmap_common::error::CommonError::from)?;
    Ok(Json(value))
}
