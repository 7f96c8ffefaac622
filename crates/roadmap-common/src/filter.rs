//! Project search and category filtering.
//!
//! A project is shown when it matches BOTH the free-text query and the active
//! category token. Category tokens are an enumerated policy; tokens outside the
//! enumeration fall back to equality against level, category or source name.

use std::fmt;

use crate::model::Project;

/// Exact-level tokens.
pub const LEVEL_TOKENS: [&str; 4] = ["Beginner", "Intermediate", "Advanced", "Capstone"];

/// Every token offered as a filter button on the projects page, in display order.
pub const FILTER_TOKENS: [&str; 8] = [
    "all",
    "Beginner",
    "Intermediate",
    "Advanced",
    "Capstone",
    "AI & ML",
    "DevOps & Cloud",
    "Open Source",
];

const AI_ML_KEYWORDS: [&str; 4] = ["AI", "Machine Learning", "ML", "Python"];
const DEVOPS_CLOUD_KEYWORDS: [&str; 6] = ["DevOps", "Cloud", "AWS", "Docker", "Kubernetes", "Terraform"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryToken {
    #[default]
    All,
    Level(String),
    AiMl,
    DevOpsCloud,
    OpenSource,
    Other(String),
}

impl CategoryToken {
    pub fn parse(token: &str) -> Self {
        match token {
            "all" => Self::All,
            "AI & ML" => Self::AiMl,
            "DevOps & Cloud" => Self::DevOpsCloud,
            "Open Source" => Self::OpenSource,
            t if LEVEL_TOKENS.contains(&t) => Self::Level(t.to_string()),
            t => Self::Other(t.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::AiMl => "AI & ML",
            Self::DevOpsCloud => "DevOps & Cloud",
            Self::OpenSource => "Open Source",
            Self::Level(t) | Self::Other(t) => t,
        }
    }

    pub fn matches(&self, p: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Level(level) => p.level.as_deref() == Some(level.as_str()),
            Self::AiMl => mentions_any(p, &AI_ML_KEYWORDS),
            Self::DevOpsCloud => mentions_any(p, &DEVOPS_CLOUD_KEYWORDS),
            Self::OpenSource => {
                p.category.as_deref() == Some("Open Source") || p.tech_stack.iter().any(|t| t == "Git")
            }
            Self::Other(token) => [&p.level, &p.category, &p.source_name]
                .into_iter()
                .any(|field| field.as_deref() == Some(token.as_str())),
        }
    }
}

impl fmt::Display for CategoryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive substring match of any keyword against source name,
/// category, or any tech-stack entry.
fn mentions_any(p: &Project, keywords: &[&str]) -> bool {
    let field_hit = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|v| keywords.iter().any(|k| v.contains(k)))
    };
    field_hit(&p.source_name)
        || field_hit(&p.category)
        || p
            .tech_stack
            .iter()
            .any(|t| keywords.iter().any(|k| t.contains(k)))
}

/// Combined text + category predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    text: String,
    category: CategoryToken,
}

impl ProjectQuery {
    pub fn new(text: &str, category: CategoryToken) -> Self {
        Self {
            text: text.to_lowercase(),
            category,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> &CategoryToken {
        &self.category
    }

    /// Title, description and tech-stack entries are searched case-insensitively.
    pub fn matches_text(&self, p: &Project) -> bool {
        if self.text.is_empty() {
            return true;
        }
        p.title.to_lowercase().contains(&self.text)
            || p.description.to_lowercase().contains(&self.text)
            || p.tech_stack.iter().any(|t| t.to_lowercase().contains(&self.text))
    }

    pub fn matches(&self, p: &Project) -> bool {
        self.matches_text(p) && self.category.matches(p)
    }

    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, level: &str, tech: &[&str]) -> Project {
        Project {
            title: title.to_string(),
            description: format!("{title} description"),
            level: Some(level.to_string()),
            tech_stack: tech.iter().map(|t| t.to_string()).collect(),
            ..Project::default()
        }
    }

    fn catalog() -> Vec<Project> {
        vec![
            project("Container Deploy", "Intermediate", &["Docker", "Node"]),
            project("Portfolio", "Beginner", &["HTML", "CSS"]),
            project("Recommender", "Advanced", &["Python", "Pandas"]),
            Project {
                category: Some("Open Source".into()),
                ..project("First PR", "Beginner", &[])
            },
            Project {
                source_name: Some("AWS Workshops".into()),
                ..project("Static Site", "Capstone", &["S3"])
            },
        ]
    }

    fn titles(found: Vec<&Project>) -> Vec<&str> {
        found.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn docker_query_finds_only_docker_project() {
        let projects = catalog();
        let q = ProjectQuery::new("docker", CategoryToken::All);
        assert_eq!(titles(q.apply(&projects)), vec!["Container Deploy"]);
    }

    #[test]
    fn level_token_is_exact() {
        let projects = catalog();
        let q = ProjectQuery::new("", CategoryToken::parse("Beginner"));
        assert_eq!(titles(q.apply(&projects)), vec!["Portfolio", "First PR"]);
    }

    #[test]
    fn ai_ml_matches_keyword_substrings() {
        let projects = catalog();
        let q = ProjectQuery::new("", CategoryToken::parse("AI & ML"));
        // "HTML" contains "ML".
        assert_eq!(titles(q.apply(&projects)), vec!["Portfolio", "Recommender"]);
    }

    #[test]
    fn devops_matches_tech_and_source() {
        let projects = catalog();
        let q = ProjectQuery::new("", CategoryToken::parse("DevOps & Cloud"));
        assert_eq!(titles(q.apply(&projects)), vec!["Container Deploy", "Static Site"]);
    }

    #[test]
    fn open_source_needs_category_or_git_entry() {
        let mut projects = catalog();
        projects.push(project("Git Hooks", "Advanced", &["Git"]));
        projects.push(project("GitHub Bot", "Advanced", &["GitHub"]));
        let q = ProjectQuery::new("", CategoryToken::parse("Open Source"));
        assert_eq!(titles(q.apply(&projects)), vec!["First PR", "Git Hooks"]);
    }

    #[test]
    fn unknown_token_falls_back_to_equality() {
        let projects = catalog();
        let q = ProjectQuery::new("", CategoryToken::parse("AWS Workshops"));
        assert_eq!(titles(q.apply(&projects)), vec!["Static Site"]);
        let q = ProjectQuery::new("", CategoryToken::parse("AWS"));
        assert!(q.apply(&projects).is_empty());
    }

    #[test]
    fn text_and_category_are_anded() {
        let projects = catalog();
        let q = ProjectQuery::new("PORT", CategoryToken::parse("Advanced"));
        assert!(q.apply(&projects).is_empty());
        let q = ProjectQuery::new("PORT", CategoryToken::parse("Beginner"));
        assert_eq!(titles(q.apply(&projects)), vec!["Portfolio"]);
    }

    #[test]
    fn enumerated_tokens_are_idempotent() {
        let projects = catalog();
        for token in FILTER_TOKENS {
            let q = ProjectQuery::new("", CategoryToken::parse(token));
            let once: Vec<Project> = q.apply(&projects).into_iter().cloned().collect();
            let twice: Vec<Project> = q.apply(&once).into_iter().cloned().collect();
            assert_eq!(once, twice, "token {token}");
        }
    }

    #[test]
    fn tokens_round_trip_through_display() {
        for token in FILTER_TOKENS {
            assert_eq!(CategoryToken::parse(token).to_string(), token);
        }
    }
}
