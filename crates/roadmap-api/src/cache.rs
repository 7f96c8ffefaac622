/// Redis response cache for the content API.
///
/// All operations return `Option<T>` for graceful degradation. If Redis is
/// unavailable, handlers read from disk.
///
/// Key schema (namespace `rmp:v1:`):
/// - `summaries`: JSON array served by `GET /api/roadmaps` (no TTL)
/// - `doc:{kind}:{id}`: raw JSON document (no TTL)
/// - `projects`: raw project catalogue (no TTL)
/// - `search:{sha256(query|category)}`: filtered projects (TTL 3600s)
/// - `content_fingerprint`: fingerprint of the content the cache was filled from
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::content::DocumentKind;
use roadmap_common::model::Project;
use roadmap_common::redis::RedisCache;

pub const NAMESPACE: &str = "rmp:v1:";
const SEARCH_TTL_SECS: u64 = 3600;

pub struct ContentCache {
    redis: RedisCache,
}

impl ContentCache {
    pub fn new(redis: RedisCache) -> Self {
        Self { redis }
    }

    pub fn disabled() -> Self {
        Self::new(RedisCache::disabled(NAMESPACE))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.redis.get(key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    async fn set_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<u64>) {
        let Ok(json) = serde_json::to_string(value) else {
            return;
        };
        match ttl {
            Some(secs) => self.redis.set_with_ttl(key, &json, secs).await,
            None => self.redis.set(key, &json).await,
        };
    }

    // --- Summaries ---

    pub async fn get_summaries(&self) -> Option<Value> {
        self.get_json("summaries").await
    }

    pub async fn set_summaries(&self, value: &Value) {
        self.set_json("summaries", value, None).await;
    }

    // --- Documents ---

    pub async fn get_document(&self, kind: DocumentKind, id: &str) -> Option<Value> {
        self.get_json(&document_key(kind, id)).await
    }

    pub async fn set_document(&self, kind: DocumentKind, id: &str, value: &Value) {
        self.set_json(&document_key(kind, id), value, None).await;
    }

    // --- Projects ---

    pub async fn get_projects(&self) -> Option<Value> {
        self.get_json("projects").await
    }

    pub async fn set_projects(&self, value: &Value) {
        self.set_json("projects", value, None).await;
    }

    pub async fn get_search_results(&self, query: &str, category: &str) -> Option<Vec<Project>> {
        self.get_json(&search_key(query, category)).await
    }

    pub async fn set_search_results(&self, query: &str, category: &str, results: &[Project]) {
        self.set_json(&search_key(query, category), results, Some(SEARCH_TTL_SECS))
            .await;
    }

    // --- Fingerprint ---

    pub async fn get_fingerprint(&self) -> Option<String> {
        self.redis.get("content_fingerprint").await
    }

    pub async fn set_fingerprint(&self, fingerprint: &str) {
        self.redis.set("content_fingerprint", fingerprint).await;
    }

    /// Drop everything cached, then record the fingerprint of the new content.
    pub async fn reset(&self, fingerprint: &str) {
        self.redis.clear_namespace().await;
        self.set_fingerprint(fingerprint).await;
    }
}

fn document_key(kind: DocumentKind, id: &str) -> String {
    format!("doc:{}:{id}", kind.label())
}

/// Deterministic key for a search; the raw query is hashed so arbitrary user
/// text never lands in a Redis key.
fn search_key(query: &str, category: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update(b"|");
    hasher.update(category.as_bytes());
    format!("search:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_keys_are_stable_and_distinct() {
        assert_eq!(search_key("docker", "all"), search_key("docker", "all"));
        assert_ne!(search_key("docker", "all"), search_key("docker", "Beginner"));
        assert!(search_key("docker", "all").starts_with("search:"));
    }

    #[tokio::test]
    async fn disabled_cache_misses() {
        let cache = ContentCache::disabled();
        cache.set_fingerprint("abc").await;
        assert_eq!(cache.get_fingerprint().await, None);
        assert!(cache.get_document(DocumentKind::Skill, "git").await.is_none());
    }
}
