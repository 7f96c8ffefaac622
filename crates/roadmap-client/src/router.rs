//! Location parsing, route resolution and the session history.

use reqwest::Url;
use serde::Serialize;

use crate::error::ClientError;

/// Origin used to resolve relative locations.
const LOCAL_ORIGIN: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub hash: Option<String>,
}

impl Location {
    /// Accepts absolute URLs and paths such as `/roadmaps/x?id=y#top`.
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let base = Url::parse(LOCAL_ORIGIN)
            .map_err(|e| ClientError::Config(format!("invalid local origin: {e}")))?;
        let url = base
            .join(raw)
            .map_err(|e| ClientError::Config(format!("invalid location '{raw}': {e}")))?;
        Ok(Self {
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
            hash: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
        })
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn resolve(&self) -> Route {
        if let Some(rest) = self.path.strip_prefix("/roadmaps/") {
            return match rest.split('/').next().filter(|id| !id.is_empty()) {
                Some(id) => Route::RoadmapDetail(percent_decode(id)),
                None => Route::Home { anchor: None },
            };
        }
        if self.path.trim_end_matches('/') == "/projects" {
            let filter = self.query_param("filter").unwrap_or("all").to_string();
            return Route::Projects { filter };
        }
        if let Some(id) = self.query_param("id").filter(|id| !id.is_empty()) {
            return Route::LegacyRoadmap(id.to_string());
        }
        Route::Home {
            anchor: self.hash.clone(),
        }
    }
}

/// `Url::path` keeps escapes; route ids are matched decoded.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = (
                (bytes[i + 1] as char).to_digit(16),
                (bytes[i + 2] as char).to_digit(16),
            );
            if let (Some(hi), Some(lo)) = hex {
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `anchor` schedules a deferred scroll once the page has rendered.
    Home { anchor: Option<String> },
    RoadmapDetail(String),
    Projects { filter: String },
    /// Standalone roadmap page addressed as `?id={id}`.
    LegacyRoadmap(String),
}

impl Route {
    pub fn view(&self) -> View {
        match self {
            Self::Home { .. } => View::Home,
            Self::RoadmapDetail(_) | Self::LegacyRoadmap(_) => View::Roadmap,
            Self::Projects { .. } => View::Projects,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Home,
    Roadmap,
    Projects,
}

/// Serialised state object of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: HistoryState,
    pub path: String,
}

impl HistoryEntry {
    pub fn home() -> Self {
        Self {
            state: HistoryState {
                view: View::Home,
                role_id: None,
            },
            path: "/".to_string(),
        }
    }

    pub fn roadmap(id: &str) -> Self {
        Self {
            state: HistoryState {
                view: View::Roadmap,
                role_id: Some(id.to_string()),
            },
            path: format!("/roadmaps/{id}"),
        }
    }

    pub fn projects() -> Self {
        Self {
            state: HistoryState {
                view: View::Projects,
                role_id: None,
            },
            path: "/projects".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    /// Initial load: the location is already the current entry.
    Replace,
}

/// Session history. A restricted origin refuses every mutation.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    restricted: bool,
}

impl History {
    pub fn new(restricted: bool) -> Self {
        Self {
            entries: Vec::new(),
            restricted,
        }
    }

    pub fn record(&mut self, mode: HistoryMode, entry: HistoryEntry) -> Result<(), ClientError> {
        if self.restricted {
            return Err(ClientError::HistoryRefused(entry.path));
        }
        if mode == HistoryMode::Replace {
            self.entries.pop();
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(raw: &str) -> Route {
        Location::parse(raw).expect("valid location").resolve()
    }

    #[test]
    fn resolves_every_view() {
        assert_eq!(route("/"), Route::Home { anchor: None });
        assert_eq!(
            route("/roadmaps/frontend-developer"),
            Route::RoadmapDetail("frontend-developer".into())
        );
        assert_eq!(route("/roadmaps/"), Route::Home { anchor: None });
        assert_eq!(route("/projects"), Route::Projects { filter: "all".into() });
        assert_eq!(
            route("/projects?filter=AI%20%26%20ML"),
            Route::Projects { filter: "AI & ML".into() }
        );
        assert_eq!(route("/roadmap.html?id=devops"), Route::LegacyRoadmap("devops".into()));
        assert_eq!(route("/about"), Route::Home { anchor: None });
    }

    #[test]
    fn roadmap_ids_are_decoded() {
        assert_eq!(route("/roadmaps/a%20b"), Route::RoadmapDetail("a b".into()));
        assert_eq!(route("/roadmaps/c%2B%2B"), Route::RoadmapDetail("c++".into()));
        assert_eq!(route("/roadmaps/100%"), Route::RoadmapDetail("100%".into()));
        assert_eq!(route("/roadmaps/x%2"), Route::RoadmapDetail("x%2".into()));
    }

    #[test]
    fn hash_on_home_becomes_anchor() {
        assert_eq!(
            route("http://localhost:8080/#skills-grid"),
            Route::Home { anchor: Some("skills-grid".into()) }
        );
        assert_eq!(route("/#"), Route::Home { anchor: None });
    }

    #[test]
    fn history_entry_state_shape() {
        let state = serde_json::to_value(&HistoryEntry::roadmap("x").state).expect("json");
        assert_eq!(state, serde_json::json!({"view": "roadmap", "roleId": "x"}));
        let state = serde_json::to_value(&HistoryEntry::home().state).expect("json");
        assert_eq!(state, serde_json::json!({"view": "home"}));
    }

    #[test]
    fn restricted_history_refuses_pushes() {
        let mut history = History::new(true);
        assert!(matches!(
            history.record(HistoryMode::Push, HistoryEntry::home()),
            Err(ClientError::HistoryRefused(_))
        ));
        assert!(history.entries().is_empty());

        let mut history = History::new(false);
        history.record(HistoryMode::Replace, HistoryEntry::home()).expect("replace");
        history.record(HistoryMode::Push, HistoryEntry::projects()).expect("push");
        history.record(HistoryMode::Replace, HistoryEntry::roadmap("a")).expect("replace");
        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.current().map(|e| e.path.as_str()), Some("/roadmaps/a"));
    }
}
