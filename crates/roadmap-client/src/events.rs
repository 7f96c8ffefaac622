//! Listener registry.
//!
//! Renderers describe the behaviour they attach as `Binding`s; the app
//! registers them under the id of the mount point they were rendered into.
//! Re-rendering a mount tears down its previous bindings first, so listeners
//! never accumulate.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NavigateHome,
    NavigateProjects,
    OpenRoadmap(String),
    OpenSkill(String),
    CloseModal,
    /// Home page card search; reads the search input.
    SearchCards,
    /// Projects page text search; reads the project search input.
    SearchProjects,
    /// Projects page category button.
    SelectFilter(String),
    /// Level buttons of the per-roadmap project section.
    FilterRoadmapProjects(String),
    ToggleDetails { button: String, details: String },
    ToggleCompletion { key: String, badge: String },
    ToggleLevel { list: String, marker: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: String,
    pub kind: EventKind,
    pub action: Action,
}

impl Binding {
    pub fn click(target: impl Into<String>, action: Action) -> Self {
        Self {
            target: target.into(),
            kind: EventKind::Click,
            action,
        }
    }

    pub fn input(target: impl Into<String>, action: Action) -> Self {
        Self {
            target: target.into(),
            kind: EventKind::Input,
            action,
        }
    }
}

#[derive(Debug)]
struct Registered {
    scope: String,
    action: Action,
}

/// One listener per (target, event kind); a later registration replaces the
/// earlier one.
#[derive(Debug, Default)]
pub struct Listeners {
    by_target: HashMap<(String, EventKind), Registered>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scope: &str, bindings: Vec<Binding>) {
        for b in bindings {
            self.by_target.insert(
                (b.target, b.kind),
                Registered {
                    scope: scope.to_string(),
                    action: b.action,
                },
            );
        }
    }

    /// Drops every listener registered under `scope`; returns how many.
    pub fn teardown(&mut self, scope: &str) -> usize {
        let before = self.by_target.len();
        self.by_target.retain(|_, r| r.scope != scope);
        before - self.by_target.len()
    }

    pub fn lookup(&self, target: &str, kind: EventKind) -> Option<&Action> {
        self.by_target
            .get(&(target.to_string(), kind))
            .map(|r| &r.action)
    }

    pub fn scope_len(&self, scope: &str) -> usize {
        self.by_target.values().filter(|r| r.scope == scope).count()
    }

    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}
