use std::sync::Arc;

use tracing::warn;

use roadmap_common::filter::{CategoryToken, ProjectQuery, FILTER_TOKENS};
use roadmap_common::model::Project;

/// Search and filter state of the projects page over the memoized catalogue.
#[derive(Debug, Clone)]
pub struct ProjectBrowser {
    projects: Arc<Vec<Project>>,
    text: String,
    active: CategoryToken,
}

impl ProjectBrowser {
    /// A filter with no button on the page falls back to `all`.
    pub fn new(projects: Arc<Vec<Project>>, initial_filter: &str) -> Self {
        let active = if FILTER_TOKENS.contains(&initial_filter) {
            CategoryToken::parse(initial_filter)
        } else {
            warn!(filter = initial_filter, "no filter button for initial filter, falling back to all");
            CategoryToken::All
        };
        Self {
            projects,
            text: String::new(),
            active,
        }
    }

    pub fn active(&self) -> &CategoryToken {
        &self.active
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn select(&mut self, token: &str) {
        self.active = CategoryToken::parse(token);
    }

    pub fn visible(&self) -> Vec<&Project> {
        ProjectQuery::new(&self.text, self.active.clone()).apply(&self.projects)
    }
}
