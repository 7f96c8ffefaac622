use std::sync::Arc;

use tracing::info;

use crate::cache::ContentCache;
use crate::content::ContentStore;
use crate::error::AppError;
use roadmap_common::filter::{CategoryToken, ProjectQuery};
use roadmap_common::model::Project;

/// Server-side project search, same predicate the client runs locally.
pub struct ProjectSearch {
    content: Arc<ContentStore>,
    cache: Arc<ContentCache>,
}

impl ProjectSearch {
    pub fn new(content: Arc<ContentStore>, cache: Arc<ContentCache>) -> Self {
        Self { content, cache }
    }

    pub async fn search(&self, query: &str, category: &str) -> Result<Vec<Project>, AppError> {
        let query = query.trim();
        let category = if category.trim().is_empty() { "all" } else { category.trim() };

        if let Some(cached) = self.cache.get_search_results(query, category).await {
            info!(query, category, "search cache hit");
            return Ok(cached);
        }

        let projects = self.content.projects().await?;
        let filter = ProjectQuery::new(query, CategoryToken::parse(category));
        let results: Vec<Project> = filter.apply(&projects).into_iter().cloned().collect();
        info!(query, category, matched = results.len(), total = projects.len(), "project search");

        self.cache.set_search_results(query, category, &results).await;
        Ok(results)
    }
}
