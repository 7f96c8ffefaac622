//! Content model shared by the API server and the client.
//!
//! Two layers live here. The wire documents (`RoadmapDocument`, `RoadmapItem`)
//! mirror the JSON files as they are authored, tolerating the historical field
//! variants. The canonical types (`Roadmap`, `Level`, `Topic`) are what the
//! renderer consumes; `crate::normalize` converts one into the other.
//! `Project`, `SkillDocument` and `RoleSummary` are close enough to canonical
//! that they are normalized in place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display names of the three roadmap levels, in render order.
pub const LEVEL_NAMES: [&str; 3] = ["Beginner", "Intermediate", "Advanced"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Role,
    Skill,
    #[serde(other)]
    Other,
}

/// Entry of `GET /api/roadmaps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Per-level grouping used by both roadmap documents and skill learning paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelMap<T> {
    #[serde(default = "Vec::new")]
    pub beginner: Vec<T>,
    #[serde(default = "Vec::new")]
    pub intermediate: Vec<T>,
    #[serde(default = "Vec::new")]
    pub advanced: Vec<T>,
}

impl<T> Default for LevelMap<T> {
    fn default() -> Self {
        Self {
            beginner: Vec::new(),
            intermediate: Vec::new(),
            advanced: Vec::new(),
        }
    }
}

impl<T> LevelMap<T> {
    /// Levels paired with their display names, in render order.
    pub fn named(&self) -> [(&'static str, &[T]); 3] {
        [
            (LEVEL_NAMES[0], self.beginner.as_slice()),
            (LEVEL_NAMES[1], self.intermediate.as_slice()),
            (LEVEL_NAMES[2], self.advanced.as_slice()),
        ]
    }

    pub fn into_named(self) -> [(&'static str, Vec<T>); 3] {
        [
            (LEVEL_NAMES[0], self.beginner),
            (LEVEL_NAMES[1], self.intermediate),
            (LEVEL_NAMES[2], self.advanced),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.beginner.is_empty() && self.intermediate.is_empty() && self.advanced.is_empty()
    }
}

/// Roadmap document as served by `GET /api/roadmaps/{id}`.
///
/// Accepts both the `roadmap: { beginner, ... }` shape and the legacy
/// `levels: [{ name, items }]` shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies_hiring: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<LevelMap<RoadmapItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<LegacyLevel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyLevel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<RoadmapItem>,
}

/// One roadmap entry. Older documents use `name`/`description`, newer ones
/// `topic`/`desc`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
}

/// A curated project. Optional list fields are empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_statement: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_concepts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub learning_outcomes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation_plan: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guide: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_pitfalls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

/// Skill document as served by `GET /api/skills/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub best_practices: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_mistakes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<LevelMap<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

// --- Canonical roadmap ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: String,
    pub title: String,
    pub description: String,
    pub career_scope: Option<String>,
    pub companies_hiring: Vec<String>,
    pub estimated_time: Option<String>,
    pub levels: Vec<Level>,
    pub projects: Vec<Project>,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub items: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub description: Option<String>,
    pub status: TopicStatus,
    pub skill_id: Option<String>,
}

/// Authored status of a topic. Anything that is not `required` or `optional`
/// is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicStatus {
    Required,
    Optional,
    Other(String),
}

impl TopicStatus {
    /// Missing status means required.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("required") => Self::Required,
            Some("optional") => Self::Optional,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_tolerates_missing_fields() {
        let p: Project = serde_json::from_str(r#"{"title":"CLI","description":"d"}"#)
            .expect("valid project");
        assert!(p.level.is_none());
        assert!(p.tech_stack.is_empty());
        assert!(p.key_concepts.is_empty());
    }

    #[test]
    fn summary_kind_accepts_unknown_types() {
        let s: RoleSummary =
            serde_json::from_str(r#"{"id":"x","type":"guide","title":"X"}"#).expect("valid");
        assert_eq!(s.kind, SummaryKind::Other);
        assert_eq!(s.description, "");
    }

    #[test]
    fn roadmap_document_reads_both_item_spellings() {
        let doc: RoadmapDocument = serde_json::from_str(
            r#"{"id":"fe","title":"FE","roadmap":{"beginner":[{"topic":"HTML","desc":"markup"},{"name":"CSS","skillId":"css"}]}}"#,
        )
        .expect("valid document");
        let roadmap = doc.roadmap.expect("roadmap present");
        assert_eq!(roadmap.beginner.len(), 2);
        assert_eq!(roadmap.beginner[1].skill_id.as_deref(), Some("css"));
        assert!(roadmap.intermediate.is_empty());
    }

    #[test]
    fn topic_status_defaults_to_required() {
        assert_eq!(TopicStatus::parse(None), TopicStatus::Required);
        assert_eq!(TopicStatus::parse(Some("optional")), TopicStatus::Optional);
        assert_eq!(TopicStatus::parse(Some("bonus")).as_str(), "bonus");
    }
}
