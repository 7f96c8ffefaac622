//! Conversion of wire documents into the canonical shapes the renderer sees.
//!
//! Blank optional strings are treated as absent, items without a title are
//! dropped, and `keyConcepts` falls back to `learningOutcomes`.

use tracing::warn;

use crate::model::{
    LegacyLevel, Level, Project, Roadmap, RoadmapDocument, RoadmapItem, RoleSummary,
    SkillDocument, Topic, TopicStatus,
};

/// Normalize a roadmap document fetched for `requested_id`.
///
/// The legacy `levels` array wins over the `roadmap` map when a document
/// carries both. The requested id stands in when the document has none.
pub fn roadmap(requested_id: &str, doc: RoadmapDocument) -> Roadmap {
    let id = if doc.id.trim().is_empty() {
        requested_id.to_string()
    } else {
        doc.id
    };

    let mut levels: Vec<Level> = match (doc.levels, doc.roadmap) {
        (Some(legacy), _) => legacy.into_iter().map(|l| legacy_level(&id, l)).collect(),
        (None, Some(map)) => map
            .into_named()
            .into_iter()
            .map(|(name, items)| Level {
                name: name.to_string(),
                items: topics(&id, name, items),
            })
            .collect(),
        (None, None) => Vec::new(),
    };
    // A level without topics renders no heading.
    levels.retain(|l| !l.items.is_empty());

    Roadmap {
        title: doc.title,
        description: doc.description,
        career_scope: non_blank(doc.career_scope),
        companies_hiring: strings(doc.companies_hiring.unwrap_or_default()),
        estimated_time: non_blank(doc.estimated_time),
        levels,
        projects: projects(doc.projects.unwrap_or_default()),
        tools: strings(doc.tools.unwrap_or_default()),
        id,
    }
}

fn legacy_level(doc_id: &str, level: LegacyLevel) -> Level {
    let items = topics(doc_id, &level.name, level.items);
    Level {
        name: level.name,
        items,
    }
}

fn topics(doc_id: &str, level: &str, items: Vec<RoadmapItem>) -> Vec<Topic> {
    items
        .into_iter()
        .filter_map(|item| {
            let title = non_blank(item.topic).or_else(|| non_blank(item.name));
            let Some(title) = title else {
                warn!(doc_id, level, "roadmap item without topic or name, skipping");
                return None;
            };
            Some(Topic {
                title,
                description: non_blank(item.desc).or_else(|| non_blank(item.description)),
                status: TopicStatus::parse(item.status.as_deref()),
                skill_id: non_blank(item.skill_id),
            })
        })
        .collect()
}

pub fn project(mut p: Project) -> Project {
    p.level = non_blank(p.level);
    p.problem_statement = non_blank(p.problem_statement);
    p.deployment_strategy = non_blank(p.deployment_strategy);
    p.security_considerations = non_blank(p.security_considerations);
    p.source_type = non_blank(p.source_type);
    p.source_name = non_blank(p.source_name);
    p.category = non_blank(p.category);
    p.learning_outcomes = strings(p.learning_outcomes);
    p.key_concepts = strings(p.key_concepts);
    if p.key_concepts.is_empty() {
        p.key_concepts = p.learning_outcomes.clone();
    }
    p.tech_stack = strings(p.tech_stack);
    p.implementation_plan = strings(p.implementation_plan);
    p.guide = strings(p.guide);
    p.common_pitfalls = strings(p.common_pitfalls);
    p
}

pub fn projects(items: Vec<Project>) -> Vec<Project> {
    items.into_iter().map(project).collect()
}

pub fn skill(mut s: SkillDocument) -> SkillDocument {
    s.prerequisites = strings(s.prerequisites);
    s.concepts = strings(s.concepts);
    s.best_practices = strings(s.best_practices);
    s.common_mistakes = strings(s.common_mistakes);
    s.projects = projects(s.projects);
    s.resources.retain(|r| !r.name.trim().is_empty() && !r.url.trim().is_empty());
    s
}

pub fn summaries(mut items: Vec<RoleSummary>) -> Vec<RoleSummary> {
    for item in &mut items {
        item.icon = non_blank(item.icon.take());
    }
    items
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn strings(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|s| !s.trim().is_empty()).collect()
}
