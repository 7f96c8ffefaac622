//! Pure renderers: content in, element trees plus the listeners they need out.
//!
//! Absent or empty optional lists omit their whole subsection. Nothing here
//! touches the document; the app mounts the returned fragments.

use std::collections::HashSet;

use reqwest::Url;
use tracing::warn;

use crate::dom::Element;
use crate::events::{Action, Binding};
use roadmap_common::completion_key::completion_key;
use roadmap_common::filter::{CategoryToken, FILTER_TOKENS, LEVEL_TOKENS};
use roadmap_common::model::{Project, Roadmap, RoleSummary, SkillDocument, SummaryKind, Topic};

pub const NO_PROJECTS_TEXT: &str = "No projects found matching your criteria.";
pub const DEFAULT_PROBLEM: &str = "Build this to learn.";
pub const DEFAULT_LEVEL: &str = "Beginner";
pub const DEFAULT_CAREER_SCOPE: &str = "High demand.";
pub const SALARY_PLACEHOLDER: &str = "Approx $80k - $150k+";
pub const VIEW_DETAILS: &str = "View Details";
pub const HIDE_DETAILS: &str = "Hide Details";
pub const ROADMAP_PROJECTS_GRID: &str = "roadmap-projects-grid";

const COMPLETED_LABEL: &str = "Completed";

/// Rendered nodes and the listeners to register for them.
#[derive(Debug, Default)]
pub struct Fragment {
    pub nodes: Vec<Element>,
    pub bindings: Vec<Binding>,
}

impl Fragment {
    fn push(&mut self, node: Element) {
        self.nodes.push(node);
    }

    fn bind(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    fn extend(&mut self, other: Fragment) {
        self.nodes.extend(other.nodes);
        self.bindings.extend(other.bindings);
    }
}

/// Lower-case dash slug for ids derived from free text.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

// --- Home ---

/// Role cards and skill cards, in that order. Summaries of any other kind
/// are not shown.
pub fn render_role_grid(summaries: &[RoleSummary]) -> (Fragment, Fragment) {
    let mut roles = Fragment::default();
    let mut skills = Fragment::default();
    for s in summaries {
        let (target, kind_class, action) = match s.kind {
            SummaryKind::Role => (&mut roles, "role-card", Action::OpenRoadmap(s.id.clone())),
            SummaryKind::Skill => (&mut skills, "skill-card", Action::OpenSkill(s.id.clone())),
            SummaryKind::Other => continue,
        };
        let id = format!("{kind_class}-{}", s.id);
        let heading = match &s.icon {
            Some(icon) => format!("{icon} {}", s.title),
            None => s.title.clone(),
        };
        target.push(
            Element::new("div")
                .with_id(id.as_str())
                .class("card")
                .class(kind_class)
                .children([
                    Element::new("h3").text(heading),
                    Element::new("p").text(s.description.as_str()),
                ]),
        );
        target.bind(Binding::click(id, action));
    }
    (roles, skills)
}

// --- Roadmap ---

/// Everything the roadmap view shows, split by mount point.
#[derive(Debug)]
pub struct RoadmapView {
    pub title: String,
    pub description: String,
    pub career_scope: String,
    pub companies: Vec<Element>,
    pub salary: &'static str,
    /// Replaces any previous `#roadmap-time` line in the header.
    pub estimated_time: Option<Element>,
    pub content: Fragment,
}

/// Completion keys of every topic, in render order.
pub fn topic_keys(doc: &Roadmap) -> Vec<String> {
    doc.levels
        .iter()
        .flat_map(|level| {
            level
                .items
                .iter()
                .map(|t| completion_key(&doc.id, &level.name, &t.title))
        })
        .collect()
}

pub fn render_roadmap(doc: &Roadmap, completed: &HashSet<String>) -> RoadmapView {
    let mut content = Fragment::default();

    for (index, level) in doc.levels.iter().enumerate() {
        let title_id = format!("level-title-{index}");
        let marker_id = format!("level-marker-{index}");
        let list_id = format!("level-list-{index}");

        let mut list = Element::new("ul").with_id(list_id.as_str()).class("topic-list");
        for topic in &level.items {
            let key = completion_key(&doc.id, &level.name, &topic.title);
            let (item, bindings) = render_topic(topic, &key, completed.contains(&key));
            list.append(item);
            content.bindings.extend(bindings);
        }

        content.push(
            Element::new("div").class("level").children([
                Element::new("h3")
                    .with_id(title_id.as_str())
                    .class("level-title")
                    .text(level.name.as_str())
                    .text(" ")
                    .child(Element::new("span").with_id(marker_id.as_str()).class("level-marker").text("▼")),
                list,
            ]),
        );
        content.bind(Binding::click(
            title_id,
            Action::ToggleLevel {
                list: list_id,
                marker: marker_id,
            },
        ));
    }

    if !doc.projects.is_empty() {
        content.extend(render_roadmap_projects(&doc.projects));
    }

    if !doc.tools.is_empty() {
        content.push(
            Element::new("div").class("roadmap-level tools").children([
                Element::new("h3").class("level-title").text("Tools & Technologies"),
                Element::new("div")
                    .class("tags")
                    .children(doc.tools.iter().map(|t| Element::new("span").class("tag").text(t.as_str()))),
            ]),
        );
    }

    RoadmapView {
        title: doc.title.clone(),
        description: doc.description.clone(),
        career_scope: doc
            .career_scope
            .clone()
            .unwrap_or_else(|| DEFAULT_CAREER_SCOPE.to_string()),
        companies: doc
            .companies_hiring
            .iter()
            .map(|c| Element::new("span").class("tag").text(c.as_str()))
            .collect(),
        salary: SALARY_PLACEHOLDER,
        estimated_time: doc.estimated_time.as_ref().map(|time| {
            Element::new("p")
                .with_id(crate::dom::ids::ROADMAP_TIME)
                .class("roadmap-time")
                .text("⏱ Estimated Time: ")
                .child(Element::new("span").class("estimated-time").text(time.as_str()))
        }),
        content,
    }
}

fn render_topic(topic: &Topic, key: &str, completed: bool) -> (Element, Vec<Binding>) {
    let status = topic.status.as_str();
    let title_id = format!("topic-{key}");
    let badge_id = format!("status-{key}");
    let mut bindings = Vec::new();

    let mut title = Element::new("span")
        .with_id(title_id.as_str())
        .class("topic-title")
        .text(topic.title.as_str());
    if let Some(skill_id) = &topic.skill_id {
        title.add_class("has-skill");
        bindings.push(Binding::click(title_id, Action::OpenSkill(skill_id.clone())));
    }

    let badge = Element::new("span")
        .with_id(badge_id.as_str())
        .class("topic-status")
        .class(if completed { "completed" } else { status })
        .attr("data-id", key)
        .attr("data-original-status", status)
        .attr("title", "Click to toggle completion")
        .text(if completed { COMPLETED_LABEL } else { status });
    bindings.push(Binding::click(
        badge_id.as_str(),
        Action::ToggleCompletion {
            key: key.to_string(),
            badge: badge_id.clone(),
        },
    ));

    let mut item = Element::new("li")
        .class("topic-item")
        .class(status)
        .child(Element::new("div").class("topic-header").children([title, badge]));
    if let Some(desc) = &topic.description {
        item.append(Element::new("div").class("topic-desc").text(desc.as_str()));
    }
    (item, bindings)
}

fn render_roadmap_projects(projects: &[Project]) -> Fragment {
    let mut fragment = Fragment::default();

    let mut filters = Element::new("div").class("project-filters");
    for token in std::iter::once("all").chain(LEVEL_TOKENS) {
        let id = format!("roadmap-filter-{}", slug(token));
        let label = if token == "all" { "All" } else { token };
        let mut button = Element::new("button")
            .with_id(id.as_str())
            .class("filter-btn")
            .attr("data-filter", token)
            .text(label);
        if token == "all" {
            button.add_class("active");
        }
        filters.append(button);
        fragment.bind(Binding::click(id, Action::FilterRoadmapProjects(token.to_string())));
    }

    let mut grid = Element::new("div").with_id(ROADMAP_PROJECTS_GRID).class("projects-grid");
    for (index, project) in projects.iter().enumerate() {
        let (card, binding) = render_project_card(project, "roadmap", index);
        grid.append(card);
        fragment.bind(binding);
    }

    fragment.push(
        Element::new("div").class("projects-section").children([
            Element::new("h3").class("level-title").text("Real-World Projects"),
            filters,
            grid,
        ]),
    );
    fragment
}

// --- Projects ---

/// One card. Ids are `{prefix}-toggle-{index}` / `{prefix}-details-{index}`.
pub fn render_project_card(p: &Project, prefix: &str, index: usize) -> (Element, Binding) {
    let level = p.level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let button_id = format!("{prefix}-toggle-{index}");
    let details_id = format!("{prefix}-details-{index}");

    let source = match (&p.source_type, &p.source_name) {
        (Some(kind), Some(name)) => format!("{kind}: {name}"),
        _ => "Curated Project".to_string(),
    };

    let mut card = Element::new("div")
        .class("project-card-enhanced")
        .class(level)
        .attr("data-level", p.level.as_deref().unwrap_or_default())
        .child(Element::new("div").class("project-header").children([
            Element::new("span")
                .class("badge")
                .class(&level.to_lowercase())
                .text(level),
            Element::new("span").class("badge source-badge").text(source),
            Element::new("h4").text(p.title.as_str()),
        ]))
        .child(
            Element::new("p")
                .class("project-problem")
                .child(Element::new("strong").text("Problem:"))
                .text(format!(" {}", p.problem_statement.as_deref().unwrap_or(DEFAULT_PROBLEM))),
        )
        .child(Element::new("p").class("project-desc").text(p.description.as_str()));

    if !p.key_concepts.is_empty() {
        card.append(
            Element::new("div")
                .class("project-concepts")
                .child(Element::new("strong").text("Key Concepts:"))
                .text(format!(" {}", p.key_concepts.join(", "))),
        );
    }

    if !p.tech_stack.is_empty() {
        card.append(
            Element::new("div")
                .class("project-tech")
                .children(p.tech_stack.iter().map(|t| Element::new("span").class("tech-tag").text(t.as_str()))),
        );
    }

    card.append(
        Element::new("button")
            .with_id(button_id.as_str())
            .class("view-project-btn")
            .text(VIEW_DETAILS),
    );
    card.append(project_details(p).with_id(details_id.as_str()).hidden(true));

    let binding = Binding::click(
        button_id.as_str(),
        Action::ToggleDetails {
            button: button_id.clone(),
            details: details_id,
        },
    );
    (card, binding)
}

fn project_details(p: &Project) -> Element {
    let mut details = Element::new("div").class("project-details");

    // Outcomes already shown as key concepts are not repeated.
    if p.learning_outcomes != p.key_concepts {
        append_list(&mut details, "Learning Outcomes:", "impl-steps", &p.learning_outcomes);
    }
    append_list(&mut details, "Implementation Plan:", "impl-steps", &p.implementation_plan);
    append_list(&mut details, "Implementation Guide:", "guide-steps", &p.guide);
    append_list(&mut details, "Common Pitfalls:", "pitfalls", &p.common_pitfalls);

    let meta: Vec<Element> = [
        ("Deployment:", &p.deployment_strategy),
        ("Security:", &p.security_considerations),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value.as_deref().map(|v| {
            Element::new("div")
                .child(Element::new("strong").text(label))
                .text(format!(" {v}"))
        })
    })
    .collect();
    if !meta.is_empty() {
        details.append(Element::new("div").class("project-meta-grid").children(meta));
    }
    details
}

fn append_list(parent: &mut Element, heading: &str, class: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    parent.append(Element::new("h5").text(heading));
    parent.append(
        Element::new("ul")
            .class(class)
            .children(items.iter().map(|s| Element::new("li").text(s.as_str()))),
    );
}

/// Cards for the projects page grid, or the empty-result message.
pub fn render_project_grid(projects: &[&Project]) -> Fragment {
    let mut fragment = Fragment::default();
    if projects.is_empty() {
        fragment.push(Element::new("p").class("empty-state").text(NO_PROJECTS_TEXT));
        return fragment;
    }
    for (index, project) in projects.iter().enumerate() {
        let (card, binding) = render_project_card(project, "global", index);
        fragment.push(card);
        fragment.bind(binding);
    }
    fragment
}

/// Category buttons of the projects page with `active` highlighted.
pub fn render_filter_buttons(active: &CategoryToken) -> Fragment {
    let mut fragment = Fragment::default();
    for token in FILTER_TOKENS {
        let id = filter_button_id(token);
        let mut button = Element::new("button")
            .with_id(id.as_str())
            .class("filter-btn")
            .attr("data-filter", token)
            .text(if token == "all" { "All" } else { token });
        if token == active.as_str() {
            button.add_class("active");
        }
        fragment.push(button);
        fragment.bind(Binding::click(id, Action::SelectFilter(token.to_string())));
    }
    fragment
}

pub fn filter_button_id(token: &str) -> String {
    format!("filter-{}", slug(token))
}

pub fn render_projects_loading() -> Element {
    Element::new("div").class("loader").text("Loading projects...")
}

pub fn render_projects_error(reason: &str) -> Element {
    Element::new("p")
        .class("error")
        .text(format!("Failed to load projects: {reason}. Please check connection."))
}

/// Title shown when a roadmap could not be fetched for a reason other than
/// a missing document.
pub fn roadmap_load_failed(reason: &str) -> String {
    format!("Failed to load roadmap: {reason}. Please check connection.")
}

// --- Skill modal ---

pub fn render_skill_loading() -> Element {
    Element::new("div").class("loading").text("Loading skill details...")
}

pub fn render_skill_unavailable() -> Element {
    Element::new("div").class("error").children([
        Element::new("h3").text("Skill Guide Coming Soon"),
        Element::new("p").text("We are working on the detailed guide for this skill."),
    ])
}

pub fn render_skill_modal(skill: &SkillDocument) -> Fragment {
    let mut fragment = Fragment::default();
    fragment.push(Element::new("div").class("modal-header-section").children([
        Element::new("h2").class("modal-title").text(skill.name.as_str()),
        Element::new("p").class("modal-subtitle").text(skill.overview.as_str()),
    ]));

    let plain = |items: &[String]| -> Vec<Element> {
        items.iter().map(|i| Element::new("li").text(i.as_str())).collect()
    };
    let marked = |mark: &str, class: &str, items: &[String]| -> Vec<Element> {
        items
            .iter()
            .map(|i| {
                Element::new("li")
                    .child(Element::new("span").class(class).text(mark))
                    .text(i.as_str())
            })
            .collect()
    };

    for (heading, items) in [
        ("Prerequisites", plain(&skill.prerequisites)),
        ("Core Concepts", plain(&skill.concepts)),
        ("Best Practices", marked("✓", "mark-good", &skill.best_practices)),
        ("Common Mistakes", marked("✗", "mark-bad", &skill.common_mistakes)),
    ] {
        if !items.is_empty() {
            fragment.push(detail_section(
                heading,
                Element::new("ul").class("detail-list").children(items),
            ));
        }
    }

    if !skill.projects.is_empty() {
        let mut grid = Element::new("div").class("projects-grid");
        for (index, project) in skill.projects.iter().enumerate() {
            let (card, binding) = render_project_card(project, "skill", index);
            grid.append(card);
            fragment.bind(binding);
        }
        fragment.push(detail_section("Real-World Projects", grid));
    }

    if let Some(path) = skill.roadmap.as_ref().filter(|p| !p.is_empty()) {
        let columns = path
            .named()
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(name, items)| {
                Element::new("div").class("roadmap-col").children([
                    Element::new("h4").text(name),
                    Element::new("ul").class("detail-list").children(plain(items)),
                ])
            });
        fragment.push(detail_section(
            "Learning Path",
            Element::new("div").class("roadmap-grid").children(columns),
        ));
    }

    if !skill.resources.is_empty() {
        let links = skill.resources.iter().map(|r| match safe_href(&r.url) {
            Some(href) => Element::new("li").child(
                Element::new("a")
                    .attr("href", href.as_str())
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .text(format!("{} ↗", r.name)),
            ),
            None => {
                warn!(name = %r.name, url = %r.url, "resource link with unsupported scheme, rendering as text");
                Element::new("li").text(r.name.as_str())
            }
        });
        fragment.push(detail_section(
            "Recommended Resources",
            Element::new("ul").class("detail-list").children(links),
        ));
    }

    fragment
}

/// Only absolute `http`/`https` URLs become links.
fn safe_href(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn detail_section(heading: &str, body: Element) -> Element {
    Element::new("div")
        .class("detail-section")
        .children([Element::new("h3").text(heading), body])
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_common::model::{Level, Resource, TopicStatus};

    fn html_roadmap() -> Roadmap {
        Roadmap {
            id: "frontend-developer".into(),
            title: "Frontend Developer".into(),
            description: "Build UIs".into(),
            career_scope: None,
            companies_hiring: vec!["Acme".into()],
            estimated_time: Some("6 months".into()),
            levels: vec![Level {
                name: "Beginner".into(),
                items: vec![Topic {
                    title: "HTML".into(),
                    description: None,
                    status: TopicStatus::Required,
                    skill_id: Some("html".into()),
                }],
            }],
            projects: Vec::new(),
            tools: Vec::new(),
        }
    }

    #[test]
    fn role_grid_splits_roles_and_skills() {
        let summaries: Vec<RoleSummary> =
            serde_json::from_value(crate::test_support::roles()).expect("roles");
        let (roles, skills) = render_role_grid(&summaries);
        assert_eq!(roles.nodes.len(), 2);
        assert_eq!(skills.nodes.len(), 1);
        assert_eq!(roles.nodes[0].text_content(), "🎨 Frontend DeveloperBuild user interfaces");
        assert_eq!(
            skills.bindings[0],
            Binding::click("skill-card-html", Action::OpenSkill("html".into()))
        );
    }

    #[test]
    fn roadmap_topic_has_status_badge() {
        let view = render_roadmap(&html_roadmap(), &HashSet::new());
        let level = &view.content.nodes[0];
        let items = level.by_class("topic-item");
        assert_eq!(items.len(), 1);
        let badge = level
            .by_id("status-frontend-developer-Beginner-HTML")
            .expect("badge");
        assert_eq!(badge.text_content(), "required");
        assert_eq!(badge.attr_value("data-id"), Some("frontend-developer-Beginner-HTML"));
        assert_eq!(view.career_scope, DEFAULT_CAREER_SCOPE);
        assert_eq!(
            view.estimated_time.map(|e| e.text_content()),
            Some("⏱ Estimated Time: 6 months".to_string())
        );
        assert!(view
            .content
            .bindings
            .contains(&Binding::click("topic-frontend-developer-Beginner-HTML", Action::OpenSkill("html".into()))));
    }

    #[test]
    fn completed_topics_render_completed() {
        let done = HashSet::from(["frontend-developer-Beginner-HTML".to_string()]);
        let view = render_roadmap(&html_roadmap(), &done);
        let badge = view.content.nodes[0]
            .by_id("status-frontend-developer-Beginner-HTML")
            .expect("badge");
        assert_eq!(badge.text_content(), "Completed");
        assert!(badge.has_class("completed"));
        assert_eq!(badge.attr_value("data-original-status"), Some("required"));
    }

    #[test]
    fn project_without_concepts_omits_section() {
        let p = Project {
            title: "Bare".into(),
            description: "d".into(),
            level: Some("Advanced".into()),
            ..Project::default()
        };
        let (card, _) = render_project_card(&p, "t", 0);
        assert!(card.by_class("project-concepts").is_empty());
        assert!(card.by_class("project-tech").is_empty());
        let problem = card.by_class("project-problem")[0].text_content();
        assert_eq!(problem, "Problem: Build this to learn.");
        let badge = card.find(&|e: &Element| e.has_class("advanced")).expect("badge");
        assert_eq!(badge.text_content(), "Advanced");
        assert!(card.by_id("t-details-0").expect("details").is_hidden());
        assert!(card.by_class("project-meta-grid").is_empty());
    }

    #[test]
    fn missing_level_defaults_to_beginner_badge() {
        let (card, _) = render_project_card(&Project::default(), "t", 0);
        let badge = card.find(&|e: &Element| e.has_class("beginner")).expect("badge");
        assert_eq!(badge.text_content(), "Beginner");
        assert!(card.to_html().contains("Curated Project"));
    }

    #[test]
    fn project_text_is_escaped() {
        let p = Project {
            title: "<img src=x onerror=alert(1)>".into(),
            ..Project::default()
        };
        let html = render_project_grid(&[&p]).nodes[0].to_html();
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn empty_grid_shows_message() {
        let fragment = render_project_grid(&[]);
        assert_eq!(fragment.nodes[0].text_content(), NO_PROJECTS_TEXT);
        assert!(fragment.bindings.is_empty());
    }

    #[test]
    fn filter_buttons_mark_active_token() {
        let fragment = render_filter_buttons(&CategoryToken::AiMl);
        assert_eq!(fragment.nodes.len(), FILTER_TOKENS.len());
        let active: Vec<_> = fragment.nodes.iter().filter(|b| b.has_class("active")).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), Some("filter-ai-ml"));
    }

    #[test]
    fn skill_modal_skips_empty_sections() {
        let skill = SkillDocument {
            name: "Git".into(),
            overview: "vcs".into(),
            best_practices: vec!["Small commits".into()],
            resources: vec![Resource {
                name: "Pro Git".into(),
                url: "https://git-scm.com/book".into(),
            }],
            ..SkillDocument::default()
        };
        let fragment = render_skill_modal(&skill);
        let headings: Vec<String> = fragment
            .nodes
            .iter()
            .flat_map(|n| n.find_all(&|e: &Element| e.tag() == "h3"))
            .map(Element::text_content)
            .collect();
        assert_eq!(headings, ["Best Practices", "Recommended Resources"]);
        let link = fragment.nodes[2].find(&|e: &Element| e.tag() == "a").expect("link");
        assert_eq!(link.attr_value("target"), Some("_blank"));
    }

    fn h3_texts(fragment: &Fragment) -> Vec<String> {
        fragment
            .nodes
            .iter()
            .flat_map(|n| n.find_all(&|e: &Element| e.tag() == "h3"))
            .map(Element::text_content)
            .collect()
    }

    #[test]
    fn missing_levels_render_no_heading() {
        let doc: roadmap_common::model::RoadmapDocument = serde_json::from_value(serde_json::json!({
            "id": "frontend-developer",
            "title": "Frontend Developer",
            "roadmap": {"beginner": [{"topic": "HTML", "status": "required"}]}
        }))
        .expect("roadmap document");
        let doc = roadmap_common::normalize::roadmap("frontend-developer", doc);
        let view = render_roadmap(&doc, &HashSet::new());
        assert_eq!(h3_texts(&view.content), ["Beginner ▼"]);
        assert!(view.content.nodes[0].by_id("level-list-0").is_some());
    }

    #[test]
    fn learning_path_skips_empty_levels() {
        let mut skill = SkillDocument {
            name: "Git".into(),
            roadmap: Some(Default::default()),
            ..SkillDocument::default()
        };
        assert!(h3_texts(&render_skill_modal(&skill)).is_empty());

        skill.roadmap = Some(roadmap_common::model::LevelMap {
            beginner: vec!["Commits".into()],
            intermediate: Vec::new(),
            advanced: vec!["Rebase".into()],
        });
        let fragment = render_skill_modal(&skill);
        assert_eq!(h3_texts(&fragment), ["Learning Path"]);
        let columns: Vec<String> = fragment.nodes[1]
            .find_all(&|e: &Element| e.tag() == "h4")
            .into_iter()
            .map(Element::text_content)
            .collect();
        assert_eq!(columns, ["Beginner", "Advanced"]);
    }

    #[test]
    fn resource_links_require_http_scheme() {
        let skill = SkillDocument {
            name: "Git".into(),
            resources: vec![
                Resource {
                    name: "Pro Git".into(),
                    url: "https://git-scm.com/book".into(),
                },
                Resource {
                    name: "Cookie jar".into(),
                    url: "javascript:alert(document.cookie)".into(),
                },
                Resource {
                    name: "Inline".into(),
                    url: "data:text/html,<script>alert(1)</script>".into(),
                },
            ],
            ..SkillDocument::default()
        };
        let fragment = render_skill_modal(&skill);
        let section = &fragment.nodes[1];
        let hrefs: Vec<String> = section
            .find_all(&|e: &Element| e.tag() == "a")
            .into_iter()
            .filter_map(|a| a.attr_value("href").map(str::to_string))
            .collect();
        assert_eq!(hrefs, ["https://git-scm.com/book"]);
        let html = section.to_html();
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("data:text"));
        assert!(html.contains("Cookie jar"));
    }

    #[test]
    fn slugs_collapse_punctuation() {
        assert_eq!(slug("AI & ML"), "ai-ml");
        assert_eq!(slug("DevOps & Cloud"), "devops-cloud");
        assert_eq!(slug("all"), "all");
    }
}
