//! Application state and view orchestration.
//!
//! `App` is the single owner of the document, listeners, history and filter
//! state. A navigation runs in three steps: `begin` updates the page
//! synchronously and takes a generation token, `Navigation::load` performs
//! the fetches without borrowing the app, and `complete` renders the result
//! unless a newer navigation has started in the meantime.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::api::ContentClient;
use crate::browser::ProjectBrowser;
use crate::completion::{self, CompletionTracker};
use crate::dom::ids::*;
use crate::dom::{Document, Element};
use crate::error::ClientError;
use crate::events::{Action, Binding, EventKind, Listeners};
use crate::render::{self, Fragment, RoadmapView};
use crate::router::{History, HistoryEntry, HistoryMode, Location, Route, View};
use roadmap_common::model::{Project, Roadmap, RoleSummary};

pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(500);
pub const ROLE_NOT_FOUND: &str = "Role not found";
pub const ROADMAP_NOT_FOUND: &str = "Roadmap not found";

/// Listener scope of the fixed page controls.
const PAGE_SCOPE: &str = "page";

pub struct App {
    document: Document,
    client: Arc<ContentClient>,
    tracker: Arc<CompletionTracker>,
    history: History,
    listeners: Listeners,
    browser: Option<ProjectBrowser>,
    generation: u64,
    current: Option<Route>,
    pending_scroll: Option<String>,
    scroll_delay: Duration,
    scrolled_to: Option<String>,
}

/// A started navigation. Holds everything needed to fetch its data.
pub struct Navigation {
    generation: u64,
    route: Route,
    mode: HistoryMode,
    fetch_roles: bool,
    client: Arc<ContentClient>,
    tracker: Arc<CompletionTracker>,
}

/// Fetched data of a navigation, ready for `App::complete`.
pub struct Loaded {
    generation: u64,
    route: Route,
    mode: HistoryMode,
    payload: Payload,
}

enum Payload {
    Home {
        anchor: Option<String>,
        /// `None` when the grid was already populated.
        roles: Option<Result<Vec<RoleSummary>, ClientError>>,
    },
    Roadmap {
        id: String,
        legacy: bool,
        result: Result<(Roadmap, HashSet<String>), ClientError>,
    },
    Projects {
        filter: String,
        result: Result<Arc<Vec<Project>>, ClientError>,
    },
}

impl Navigation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn load(self) -> Loaded {
        let payload = match &self.route {
            Route::Home { anchor } => Payload::Home {
                anchor: anchor.clone(),
                roles: if self.fetch_roles {
                    Some(self.client.fetch_roles().await)
                } else {
                    None
                },
            },
            Route::RoadmapDetail(id) | Route::LegacyRoadmap(id) => {
                let result = match self.client.fetch_roadmap(id).await {
                    Ok(doc) => {
                        let keys = render::topic_keys(&doc);
                        let done = self
                            .tracker
                            .completed_among(keys.iter().map(String::as_str))
                            .await;
                        Ok((doc, done))
                    }
                    Err(e) => Err(e),
                };
                Payload::Roadmap {
                    id: id.clone(),
                    legacy: matches!(self.route, Route::LegacyRoadmap(_)),
                    result,
                }
            }
            Route::Projects { filter } => Payload::Projects {
                filter: filter.clone(),
                result: self.client.fetch_projects().await,
            },
        };
        Loaded {
            generation: self.generation,
            route: self.route,
            mode: self.mode,
            payload,
        }
    }
}

impl App {
    pub fn new(client: Arc<ContentClient>, tracker: CompletionTracker, restricted_origin: bool) -> Self {
        let mut listeners = Listeners::new();
        listeners.register(
            PAGE_SCOPE,
            vec![
                Binding::click(NAV_HOME, Action::NavigateHome),
                Binding::click(BACK_TO_HOME, Action::NavigateHome),
                Binding::click(NAV_PROJECTS, Action::NavigateProjects),
                Binding::click(CLOSE_MODAL, Action::CloseModal),
                Binding::input(SEARCH_INPUT, Action::SearchCards),
                Binding::input(PROJECT_SEARCH, Action::SearchProjects),
            ],
        );
        Self {
            document: Document::page(),
            client,
            tracker: Arc::new(tracker),
            history: History::new(restricted_origin),
            listeners,
            browser: None,
            generation: 0,
            current: None,
            pending_scroll: None,
            scroll_delay: DEFAULT_SCROLL_DELAY,
            scrolled_to: None,
        }
    }

    pub fn with_scroll_delay(mut self, delay: Duration) -> Self {
        self.scroll_delay = delay;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    pub fn browser(&self) -> Option<&ProjectBrowser> {
        self.browser.as_ref()
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn scrolled_to(&self) -> Option<&str> {
        self.scrolled_to.as_deref()
    }

    /// Initial page load for `url`. The location already is the current
    /// history entry, so it is replaced rather than pushed.
    pub async fn start(&mut self, url: &str) -> Result<(), ClientError> {
        let route = Location::parse(url)?.resolve();
        info!(url, route = ?route, "starting client");
        self.go(route, HistoryMode::Replace).await;
        Ok(())
    }

    pub async fn navigate(&mut self, route: Route) {
        self.go(route, HistoryMode::Push).await;
    }

    async fn go(&mut self, route: Route, mode: HistoryMode) {
        let navigation = self.begin(route, mode);
        let loaded = navigation.load().await;
        self.complete(loaded);
        self.run_deferred_scroll().await;
    }

    /// Shows the target view with its loading state and invalidates every
    /// navigation started before this one.
    pub fn begin(&mut self, route: Route, mode: HistoryMode) -> Navigation {
        self.generation += 1;
        let fetch_roles = matches!(route, Route::Home { .. })
            && self
                .document
                .get(ROLES_GRID)
                .map_or(true, |grid| !grid.has_child_nodes());
        log_abort(self.prepare(&route, mode, fetch_roles));
        debug!(generation = self.generation, route = ?route, "navigation started");
        Navigation {
            generation: self.generation,
            route,
            mode,
            fetch_roles,
            client: Arc::clone(&self.client),
            tracker: Arc::clone(&self.tracker),
        }
    }

    /// Renders a loaded navigation. Returns `false` when it was superseded.
    pub fn complete(&mut self, loaded: Loaded) -> bool {
        if loaded.generation != self.generation {
            info!(
                stale = loaded.generation,
                current = self.generation,
                route = ?loaded.route,
                "discarding stale navigation response"
            );
            return false;
        }
        let result = match loaded.payload {
            Payload::Home { anchor, roles } => self.apply_home(anchor, roles),
            Payload::Roadmap { id, legacy, result } => {
                if legacy {
                    self.apply_legacy_roadmap(&id, result)
                } else {
                    self.apply_roadmap(&id, loaded.mode, result)
                }
            }
            Payload::Projects { filter, result } => self.apply_projects(&filter, result),
        };
        log_abort(result);
        self.current = Some(loaded.route);
        true
    }

    fn prepare(&mut self, route: &Route, mode: HistoryMode, fetch_roles: bool) -> Result<(), ClientError> {
        self.show_view(route.view())?;
        match route {
            Route::Home { .. } => {
                self.record_history(mode, HistoryEntry::home());
                if fetch_roles {
                    self.document.mount(ROLES_STATUS)?.set_text("Loading roles...");
                }
            }
            Route::RoadmapDetail(_) | Route::LegacyRoadmap(_) => {
                self.document.mount(ROADMAP_HEADER)?.replace_children(vec![
                    Element::new("h1").with_id(ROADMAP_TITLE).text("Loading..."),
                    Element::new("p").with_id(ROADMAP_DESC),
                ]);
                self.mount_fragment(ROADMAP_CONTENT, Fragment::default())?;
            }
            Route::Projects { .. } => {
                self.record_history(mode, HistoryEntry::projects());
                if self.client.cached_projects().is_none() {
                    self.listeners.teardown(GLOBAL_PROJECTS_GRID);
                    self.document
                        .mount(GLOBAL_PROJECTS_GRID)?
                        .replace_children(vec![render::render_projects_loading()]);
                }
            }
        }
        Ok(())
    }

    fn show_view(&mut self, view: View) -> Result<(), ClientError> {
        for (id, v) in [
            (HOME_VIEW, View::Home),
            (ROADMAP_VIEW, View::Roadmap),
            (PROJECTS_VIEW, View::Projects),
        ] {
            self.document.mount(id)?.set_hidden(v != view);
        }
        Ok(())
    }

    fn record_history(&mut self, mode: HistoryMode, entry: HistoryEntry) {
        if let Err(e) = self.history.record(mode, entry) {
            debug!(error = %e, "history update skipped");
        }
    }

    /// Replaces a mount point's children and its listeners.
    fn mount_fragment(&mut self, id: &str, fragment: Fragment) -> Result<(), ClientError> {
        let mount = self.document.mount(id)?;
        mount.replace_children(fragment.nodes);
        let removed = self.listeners.teardown(id);
        let added = fragment.bindings.len();
        self.listeners.register(id, fragment.bindings);
        debug!(mount = id, removed, added, "listeners replaced");
        Ok(())
    }

    // --- Home ---

    fn apply_home(
        &mut self,
        anchor: Option<String>,
        roles: Option<Result<Vec<RoleSummary>, ClientError>>,
    ) -> Result<(), ClientError> {
        self.pending_scroll = anchor;
        match roles {
            None => Ok(()),
            Some(Ok(roles)) => {
                let (role_cards, skill_cards) = render::render_role_grid(&roles);
                self.mount_fragment(ROLES_GRID, role_cards)?;
                self.mount_fragment(SKILLS_GRID, skill_cards)?;
                self.document.mount(ROLES_STATUS)?.clear();
                info!(count = roles.len(), "roles rendered");
                self.filter_cards()
            }
            Some(Err(e)) => {
                error!(error = %e, "failed to load roles");
                self.document
                    .mount(ROLES_STATUS)?
                    .set_text(format!("Failed to load roles: {e}"));
                Ok(())
            }
        }
    }

    fn filter_cards(&mut self) -> Result<(), ClientError> {
        let term = self.input_value(SEARCH_INPUT).to_lowercase();
        for grid in [ROLES_GRID, SKILLS_GRID] {
            self.document.mount(grid)?.for_each_mut(
                &|e: &Element| e.has_class("card"),
                &mut |card: &mut Element| {
                    let matches = card.text_content().to_lowercase().contains(&term);
                    card.set_hidden(!matches);
                },
            );
        }
        Ok(())
    }

    /// One-shot scroll to the anchor of the last home navigation.
    pub async fn run_deferred_scroll(&mut self) {
        let Some(anchor) = self.pending_scroll.take() else {
            return;
        };
        tokio::time::sleep(self.scroll_delay).await;
        if self.document.get(&anchor).is_some() {
            info!(anchor, "scrolled to anchor");
            self.scrolled_to = Some(anchor);
        } else {
            debug!(anchor, "scroll target not found");
        }
    }

    // --- Roadmap ---

    fn apply_roadmap(
        &mut self,
        id: &str,
        mode: HistoryMode,
        result: Result<(Roadmap, HashSet<String>), ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok((doc, done)) => {
                self.apply_roadmap_view(render::render_roadmap(&doc, &done))?;
                self.record_history(mode, HistoryEntry::roadmap(id));
                info!(id, levels = doc.levels.len(), completed = done.len(), "roadmap rendered");
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "failed to load roadmap");
                let title = if e.is_not_found() {
                    ROLE_NOT_FOUND.to_string()
                } else {
                    render::roadmap_load_failed(&e.to_string())
                };
                self.document.mount(ROADMAP_TITLE)?.set_text(title);
                Ok(())
            }
        }
    }

    fn apply_legacy_roadmap(
        &mut self,
        id: &str,
        result: Result<(Roadmap, HashSet<String>), ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok((doc, done)) => self.apply_roadmap_view(render::render_roadmap(&doc, &done)),
            Err(e) => {
                warn!(id, error = %e, "failed to load standalone roadmap");
                let title = if e.is_not_found() {
                    ROADMAP_NOT_FOUND.to_string()
                } else {
                    render::roadmap_load_failed(&e.to_string())
                };
                self.document
                    .mount(ROADMAP_HEADER)?
                    .replace_children(vec![Element::new("h1").text(title)]);
                Ok(())
            }
        }
    }

    fn apply_roadmap_view(&mut self, view: RoadmapView) -> Result<(), ClientError> {
        self.document.mount(ROADMAP_TITLE)?.set_text(view.title);
        self.document.mount(ROADMAP_DESC)?.set_text(view.description);
        self.document.mount(ROLE_SCOPE)?.set_text(view.career_scope);
        self.document
            .mount(ROLE_COMPANIES)?
            .replace_children(view.companies);
        self.document.mount(ROLE_SALARY)?.set_text(view.salary);

        let header = self.document.mount(ROADMAP_HEADER)?;
        header.remove_by_id(ROADMAP_TIME);
        if let Some(time) = view.estimated_time {
            header.append(time);
        }
        self.mount_fragment(ROADMAP_CONTENT, view.content)
    }

    fn filter_roadmap_projects(&mut self, token: &str) -> Result<(), ClientError> {
        self.document.mount(ROADMAP_CONTENT)?.for_each_mut(
            &|e: &Element| e.has_class("filter-btn"),
            &mut |button: &mut Element| {
                if button.attr_value("data-filter") == Some(token) {
                    button.add_class("active");
                } else {
                    button.remove_class("active");
                }
            },
        );
        self.document.mount(render::ROADMAP_PROJECTS_GRID)?.for_each_mut(
            &|e: &Element| e.has_class("project-card-enhanced"),
            &mut |card: &mut Element| {
                let show = token == "all" || card.attr_value("data-level") == Some(token);
                card.set_hidden(!show);
            },
        );
        Ok(())
    }

    fn toggle_level(&mut self, list: &str, marker: &str) -> Result<(), ClientError> {
        let list = self.document.mount(list)?;
        let collapse = !list.is_hidden();
        list.set_hidden(collapse);
        self.document
            .mount(marker)?
            .set_text(if collapse { "▶" } else { "▼" });
        Ok(())
    }

    async fn toggle_completion(&mut self, key: &str, badge: &str) -> Result<(), ClientError> {
        let completed = self.tracker.toggle_completed(key).await?;
        completion::apply_badge(self.document.mount(badge)?, completed);
        Ok(())
    }

    // --- Projects ---

    fn apply_projects(
        &mut self,
        filter: &str,
        result: Result<Arc<Vec<Project>>, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(projects) => {
                let mut browser = ProjectBrowser::new(projects, filter);
                browser.set_text(&self.input_value(PROJECT_SEARCH));
                self.mount_fragment(GLOBAL_FILTERS, render::render_filter_buttons(browser.active()))?;
                self.browser = Some(browser);
                self.refresh_projects()
            }
            Err(e) => {
                error!(error = %e, "failed to load projects");
                self.mount_fragment(
                    GLOBAL_PROJECTS_GRID,
                    Fragment {
                        nodes: vec![render::render_projects_error(&e.to_string())],
                        bindings: Vec::new(),
                    },
                )
            }
        }
    }

    /// Re-renders the projects grid from the current browser state.
    fn refresh_projects(&mut self) -> Result<(), ClientError> {
        let Some(browser) = &self.browser else {
            return Ok(());
        };
        let visible = browser.visible();
        debug!(
            text = browser.text(),
            filter = %browser.active(),
            count = visible.len(),
            "projects filtered"
        );
        let fragment = render::render_project_grid(&visible);
        self.mount_fragment(GLOBAL_PROJECTS_GRID, fragment)
    }

    fn select_filter(&mut self, token: &str) -> Result<(), ClientError> {
        if let Some(browser) = &mut self.browser {
            browser.select(token);
        }
        self.document.mount(GLOBAL_FILTERS)?.for_each_mut(
            &|e: &Element| e.has_class("filter-btn"),
            &mut |button: &mut Element| {
                if button.attr_value("data-filter") == Some(token) {
                    button.add_class("active");
                } else {
                    button.remove_class("active");
                }
            },
        );
        self.refresh_projects()
    }

    fn search_projects(&mut self) -> Result<(), ClientError> {
        let text = self.input_value(PROJECT_SEARCH);
        if let Some(browser) = &mut self.browser {
            browser.set_text(&text);
        }
        self.refresh_projects()
    }

    fn toggle_details(&mut self, button: &str, details: &str) -> Result<(), ClientError> {
        let details = self.document.mount(details)?;
        let expand = details.is_hidden();
        details.set_hidden(!expand);
        self.document.mount(button)?.set_text(if expand {
            render::HIDE_DETAILS
        } else {
            render::VIEW_DETAILS
        });
        Ok(())
    }

    // --- Skill modal ---

    pub async fn load_skill(&mut self, id: &str) -> Result<(), ClientError> {
        if id.is_empty() {
            return Ok(());
        }
        self.document.mount(SKILL_MODAL)?.set_hidden(false);
        self.mount_fragment(
            MODAL_BODY,
            Fragment {
                nodes: vec![render::render_skill_loading()],
                bindings: Vec::new(),
            },
        )?;
        let fragment = match self.client.fetch_skill(id).await {
            Ok(skill) => render::render_skill_modal(&skill),
            Err(e) => {
                warn!(skill = id, error = %e, "skill guide unavailable");
                Fragment {
                    nodes: vec![render::render_skill_unavailable()],
                    bindings: Vec::new(),
                }
            }
        };
        self.mount_fragment(MODAL_BODY, fragment)
    }

    // --- Events ---

    /// Runs the listener registered for `target`. Returns whether one was.
    pub async fn dispatch(&mut self, target: &str, kind: EventKind) -> bool {
        let Some(action) = self.listeners.lookup(target, kind).cloned() else {
            debug!(target, kind = ?kind, "no listener");
            return false;
        };
        self.handle(action).await;
        true
    }

    pub async fn click(&mut self, target: &str) -> bool {
        self.dispatch(target, EventKind::Click).await
    }

    /// Sets an input's value and fires its input event.
    pub async fn type_into(&mut self, input: &str, text: &str) -> bool {
        match self.document.mount(input) {
            Ok(el) => el.set_attr("value", text),
            Err(e) => {
                error!(error = %e, "cannot type into missing input");
                return false;
            }
        }
        self.dispatch(input, EventKind::Input).await
    }

    async fn handle(&mut self, action: Action) {
        let result = match action {
            Action::NavigateHome => {
                self.navigate(Route::Home { anchor: None }).await;
                Ok(())
            }
            Action::NavigateProjects => {
                self.navigate(Route::Projects {
                    filter: "all".to_string(),
                })
                .await;
                Ok(())
            }
            Action::OpenRoadmap(id) => {
                self.navigate(Route::RoadmapDetail(id)).await;
                Ok(())
            }
            Action::OpenSkill(id) => self.load_skill(&id).await,
            Action::CloseModal => self
                .document
                .mount(SKILL_MODAL)
                .map(|modal| modal.set_hidden(true)),
            Action::SearchCards => self.filter_cards(),
            Action::SearchProjects => self.search_projects(),
            Action::SelectFilter(token) => self.select_filter(&token),
            Action::FilterRoadmapProjects(token) => self.filter_roadmap_projects(&token),
            Action::ToggleDetails { button, details } => self.toggle_details(&button, &details),
            Action::ToggleCompletion { key, badge } => self.toggle_completion(&key, &badge).await,
            Action::ToggleLevel { list, marker } => self.toggle_level(&list, &marker),
        };
        log_abort(result);
    }

    fn input_value(&self, id: &str) -> String {
        self.document
            .get(id)
            .and_then(|e| e.attr_value("value"))
            .unwrap_or_default()
            .to_string()
    }
}

fn log_abort(result: Result<(), ClientError>) {
    if let Err(e) = result {
        error!(error = %e, "operation aborted");
    }
}
