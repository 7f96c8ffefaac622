//! HTTP client for the content API.
//!
//! Every fetch decodes and normalizes at this boundary, so callers only see
//! canonical shapes. Identical requests already in flight are coalesced into
//! one network call, and the project catalogue is memoized for the lifetime
//! of the client. Failures are never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use roadmap_common::model::{Project, Roadmap, RoadmapDocument, RoleSummary, SkillDocument};
use roadmap_common::normalize;

#[derive(Debug, Clone)]
enum FetchFailure {
    Status(StatusCode),
    Transport(String),
    Decode(String),
}

type SharedFetch = Shared<BoxFuture<'static, Result<Value, FetchFailure>>>;

pub struct ContentClient {
    base_url: Url,
    http: reqwest::Client,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
    projects: tokio::sync::Mutex<Option<Arc<Vec<Project>>>>,
    requests: Arc<AtomicU64>,
}

impl ContentClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL cannot carry a path: {}",
                config.base_url
            )));
        }
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url,
            http,
            in_flight: Mutex::new(HashMap::new()),
            projects: tokio::sync::Mutex::new(None),
            requests: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Network requests actually issued (coalesced and cached calls excluded).
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// `GET /api/roadmaps`
    pub async fn fetch_roles(&self) -> Result<Vec<RoleSummary>, ClientError> {
        let value = self.get_json(&["api", "roadmaps"], None).await?;
        let roles: Vec<RoleSummary> = decode(value)?;
        Ok(normalize::summaries(roles))
    }

    /// `GET /api/roadmaps/{id}`; any non-2xx is `NotFound`.
    pub async fn fetch_roadmap(&self, id: &str) -> Result<Roadmap, ClientError> {
        let value = self
            .get_json(&["api", "roadmaps", id], Some(format!("roadmap '{id}'")))
            .await?;
        let doc: RoadmapDocument = decode(value)?;
        Ok(normalize::roadmap(id, doc))
    }

    /// `GET /api/skills/{id}`; any non-2xx is `NotFound`.
    pub async fn fetch_skill(&self, id: &str) -> Result<SkillDocument, ClientError> {
        let value = self
            .get_json(&["api", "skills", id], Some(format!("skill '{id}'")))
            .await?;
        let skill: SkillDocument = decode(value)?;
        Ok(normalize::skill(skill))
    }

    /// `GET /api/projects`, memoized. The slot stays locked while the first
    /// fetch runs, so concurrent callers wait for it instead of refetching.
    pub async fn fetch_projects(&self) -> Result<Arc<Vec<Project>>, ClientError> {
        let mut slot = self.projects.lock().await;
        if let Some(cached) = slot.as_ref() {
            debug!(count = cached.len(), "project cache hit");
            return Ok(Arc::clone(cached));
        }
        let value = self.get_json(&["api", "projects"], None).await?;
        let projects = Arc::new(normalize::projects(decode(value)?));
        info!(count = projects.len(), "projects loaded");
        *slot = Some(Arc::clone(&projects));
        Ok(projects)
    }

    /// The memoized catalogue, if loaded and not currently being fetched.
    pub fn cached_projects(&self) -> Option<Arc<Vec<Project>>> {
        self.projects.try_lock().ok().and_then(|slot| slot.clone())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET and parse JSON, joining an identical request already in flight.
    ///
    /// `not_found` labels id lookups: for those every non-2xx status is
    /// reported as `NotFound`.
    async fn get_json(&self, segments: &[&str], not_found: Option<String>) -> Result<Value, ClientError> {
        let url = self.endpoint(segments)?;
        let key = url.to_string();

        let fetch = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match in_flight.get(&key) {
                Some(existing) => {
                    debug!(url = %key, "joining in-flight request");
                    existing.clone()
                }
                None => {
                    let fetch = fetch_json(self.http.clone(), url, Arc::clone(&self.requests))
                        .boxed()
                        .shared();
                    in_flight.insert(key.clone(), fetch.clone());
                    fetch
                }
            }
        };

        let result = fetch.clone().await;

        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if in_flight.get(&key).is_some_and(|f| f.ptr_eq(&fetch)) {
                in_flight.remove(&key);
            }
        }

        result.map_err(|failure| match (failure, not_found) {
            (FetchFailure::Status(_), Some(label)) => ClientError::NotFound(label),
            (FetchFailure::Status(StatusCode::NOT_FOUND), None) => ClientError::NotFound(key),
            (FetchFailure::Status(status), None) => {
                ClientError::RequestFailed(format!("HTTP error! status: {}", status.as_u16()))
            }
            (FetchFailure::Transport(msg), _) => ClientError::RequestFailed(msg),
            (FetchFailure::Decode(msg), _) => {
                ClientError::RequestFailed(format!("invalid response body: {msg}"))
            }
        })
    }
}

async fn fetch_json(
    http: reqwest::Client,
    url: Url,
    requests: Arc<AtomicU64>,
) -> Result<Value, FetchFailure> {
    requests.fetch_add(1, Ordering::Relaxed);
    debug!(url = %url, "GET");
    let resp = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchFailure::Transport(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "content API returned error status");
        return Err(FetchFailure::Status(status));
    }
    resp.json::<Value>()
        .await
        .map_err(|e| FetchFailure::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value)
        .map_err(|e| ClientError::RequestFailed(format!("invalid response body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_api;

    #[tokio::test]
    async fn projects_are_fetched_once() {
        let api = spawn_api().await;
        let client = ContentClient::new(&ClientConfig::with_base_url(&api.base_url)).expect("client");

        let first = client.fetch_projects().await.expect("projects");
        let second = client.fetch_projects().await.expect("projects");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(api.hits("/api/projects"), 1);
        assert_eq!(client.request_count(), 1);
        assert!(client.cached_projects().is_some());
    }

    #[tokio::test]
    async fn concurrent_identical_fetches_are_coalesced() {
        let api = spawn_api().await;
        let client = ContentClient::new(&ClientConfig::with_base_url(&api.base_url)).expect("client");

        let (a, b, c) = tokio::join!(
            client.fetch_roadmap("frontend-developer"),
            client.fetch_roadmap("frontend-developer"),
            client.fetch_roadmap("frontend-developer"),
        );
        assert_eq!(a.expect("a").title, "Frontend Developer");
        assert_eq!(b.expect("b").levels.len(), 2);
        assert!(c.is_ok());
        assert_eq!(api.hits("/api/roadmaps/frontend-developer"), 1);

        // Completed requests are not memoized.
        client.fetch_roadmap("frontend-developer").await.expect("refetch");
        assert_eq!(api.hits("/api/roadmaps/frontend-developer"), 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let api = spawn_api().await;
        let client = ContentClient::new(&ClientConfig::with_base_url(&api.base_url)).expect("client");

        let err = client.fetch_roadmap("unknown-role").await.expect_err("missing");
        assert!(err.is_not_found());
        let err = client.fetch_skill("nope").await.expect_err("missing");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let api = spawn_api().await;
        api.fail_projects(true);
        let client = ContentClient::new(&ClientConfig::with_base_url(&api.base_url)).expect("client");

        let err = client.fetch_projects().await.expect_err("server error");
        assert!(matches!(&err, ClientError::RequestFailed(msg) if msg.contains("500")));
        assert!(client.cached_projects().is_none());

        api.fail_projects(false);
        let projects = client.fetch_projects().await.expect("projects");
        assert!(!projects.is_empty());
        assert_eq!(api.hits("/api/projects"), 2);
    }

    #[tokio::test]
    async fn unreachable_api_is_request_failed() {
        let client = ContentClient::new(&ClientConfig::with_base_url("http://127.0.0.1:9")).expect("client");
        let err = client.fetch_roles().await.expect_err("connection refused");
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn ids_are_percent_encoded() {
        let client = ContentClient::new(&ClientConfig::with_base_url("http://example.test/base/")).expect("client");
        let url = client.endpoint(&["api", "roadmaps", "a b/c"]).expect("url");
        assert_eq!(url.as_str(), "http://example.test/base/api/roadmaps/a%20b%2Fc");
    }
}
