//! In-process stand-in for the content API, for client tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Default)]
struct MockState {
    hits: Mutex<HashMap<String, usize>>,
    fail_projects: AtomicBool,
}

pub(crate) struct MockApi {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockApi {
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .expect("hits lock")
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn fail_projects(&self, fail: bool) {
        self.state.fail_projects.store(fail, Ordering::SeqCst);
    }
}

pub(crate) async fn spawn_api() -> MockApi {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/api/roadmaps", get(|| async { Json(roles()) }))
        .route("/api/roadmaps/{id}", get(roadmap))
        .route("/api/skills/{id}", get(skill))
        .route("/api/projects", get(projects))
        .layer(middleware::from_fn_with_state(state.clone(), count_hits))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api");
    });

    MockApi {
        base_url: format!("http://{addr}"),
        state,
    }
}

async fn count_hits(State(state): State<Arc<MockState>>, req: Request, next: Next) -> Response {
    *state
        .hits
        .lock()
        .expect("hits lock")
        .entry(req.uri().path().to_string())
        .or_default() += 1;
    next.run(req).await
}

async fn roadmap(Path(id): Path<String>) -> Response {
    // Long enough for concurrent callers to overlap.
    tokio::time::sleep(Duration::from_millis(50)).await;
    match id.as_str() {
        "frontend-developer" => Json(frontend_roadmap()).into_response(),
        "legacy-doc" => Json(legacy_roadmap()).into_response(),
        "data-engineer" => Json(sparse_roadmap()).into_response(),
        _ => not_found(&id),
    }
}

async fn skill(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "html" => Json(html_skill()).into_response(),
        "git" => Json(git_skill()).into_response(),
        _ => not_found(&id),
    }
}

async fn projects(State(state): State<Arc<MockState>>) -> Response {
    if state.fail_projects.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))).into_response();
    }
    Json(catalogue()).into_response()
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("'{id}' not found")})),
    )
        .into_response()
}

pub(crate) fn roles() -> Value {
    json!([
        {"id": "frontend-developer", "type": "role", "title": "Frontend Developer",
         "description": "Build user interfaces", "icon": "🎨"},
        {"id": "devops-engineer", "type": "role", "title": "DevOps Engineer",
         "description": "Automate delivery"},
        {"id": "html", "type": "skill", "title": "HTML", "description": "Markup basics"}
    ])
}

pub(crate) fn frontend_roadmap() -> Value {
    json!({
        "id": "frontend-developer",
        "title": "Frontend Developer",
        "description": "Build user interfaces",
        "companiesHiring": ["Acme", "Globex"],
        "estimatedTime": "6 months",
        "roadmap": {
            "beginner": [{"topic": "HTML", "status": "required", "skillId": "html", "desc": "Markup"}],
            "intermediate": [{"topic": "State Management", "status": "optional"}],
            "advanced": []
        },
        "projects": [
            {"title": "Portfolio Site", "description": "Personal site", "level": "Beginner",
             "techStack": ["HTML", "CSS"]},
            {"title": "Design System", "description": "Reusable components", "level": "Advanced",
             "learningOutcomes": ["Tokens"], "implementationPlan": ["Audit", "Build"]}
        ],
        "tools": ["VS Code", "Chrome DevTools"]
    })
}

pub(crate) fn legacy_roadmap() -> Value {
    json!({
        "id": "legacy-doc",
        "title": "Legacy Roadmap",
        "description": "Old shape",
        "levels": [{"name": "Getting Started", "items": [{"name": "Git Basics", "description": "Commits"}]}]
    })
}

pub(crate) fn html_skill() -> Value {
    json!({
        "name": "HTML",
        "overview": "Structure of the web",
        "concepts": ["Semantics"],
        "bestPractices": ["Use landmarks"],
        "commonMistakes": ["Div soup"],
        "roadmap": {"beginner": ["Tags"], "intermediate": ["Forms"], "advanced": ["Accessibility"]},
        "resources": [{"name": "MDN", "url": "https://developer.mozilla.org"}]
    })
}

/// Only the intermediate level key is present.
pub(crate) fn sparse_roadmap() -> Value {
    json!({
        "id": "data-engineer",
        "title": "Data Engineer",
        "description": "Pipelines",
        "roadmap": {"intermediate": [{"topic": "SQL", "status": "required"}]}
    })
}

pub(crate) fn git_skill() -> Value {
    json!({
        "name": "Git",
        "overview": "Version control",
        "roadmap": {},
        "resources": [
            {"name": "Pro Git", "url": "https://git-scm.com/book"},
            {"name": "Cookie jar", "url": "javascript:alert(document.cookie)"}
        ]
    })
}

pub(crate) fn catalogue() -> Value {
    json!([
        {"title": "Container Deploy", "description": "Ship a service", "level": "Intermediate",
         "problemStatement": "Deploys are manual", "techStack": ["Docker", "Kubernetes"],
         "keyConcepts": ["Images"], "deploymentStrategy": "Rolling"},
        {"title": "Portfolio Site", "description": "Personal site", "level": "Beginner",
         "techStack": ["HTML", "CSS"]},
        {"title": "Chat Bot", "description": "Answer questions", "level": "Advanced",
         "techStack": ["Python"], "sourceType": "Course", "sourceName": "Fast AI"},
        {"title": "CLI Tool", "description": "Terminal utility", "level": "Capstone",
         "category": "Open Source", "techStack": ["Rust", "Git"]}
    ])
}
