//! Headless element tree.
//!
//! Renderers build `Element` values with the builder methods; the app mounts
//! them under elements addressed by id in a `Document`. Text and attribute
//! values are stored raw and escaped only when serialised with `to_html`, so
//! content can never inject markup.

use std::fmt::Write as _;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    hidden: bool,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            hidden: false,
            children: Vec::new(),
        }
    }

    // --- Builders ---

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds each whitespace-separated class in `classes`.
    pub fn class(mut self, classes: &str) -> Self {
        self.add_class(classes);
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    // --- Accessors ---

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn has_child_nodes(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    // --- Mutation ---

    pub fn add_class(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Replaces the whole class list.
    pub fn set_class_name(&mut self, classes: &str) {
        self.classes.clear();
        self.add_class(classes);
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.children = children.into_iter().map(Node::Element).collect();
    }

    /// Removes every descendant with the given id. Returns whether any was removed.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.children.len();
        self.children
            .retain(|n| !matches!(n, Node::Element(e) if e.id.as_deref() == Some(id)));
        let mut removed = before != self.children.len();
        for child in &mut self.children {
            if let Node::Element(e) = child {
                removed |= e.remove_by_id(id);
            }
        }
        removed
    }

    // --- Queries ---

    /// Depth-first search including `self`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(e) = child {
                if let Some(found) = e.find_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_matching(pred, &mut out);
        out
    }

    fn collect_matching<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect_matching(pred, out);
        }
    }

    /// Applies `f` to every descendant (and `self`) matching `pred`.
    pub fn for_each_mut(&mut self, pred: &dyn Fn(&Element) -> bool, f: &mut dyn FnMut(&mut Element)) {
        if pred(self) {
            f(self);
        }
        for child in &mut self.children {
            if let Node::Element(e) = child {
                e.for_each_mut(pred, f);
            }
        }
    }

    pub fn by_id(&self, id: &str) -> Option<&Element> {
        self.find(&|e: &Element| e.id.as_deref() == Some(id))
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.find_mut(&|e: &Element| e.id.as_deref() == Some(id))
    }

    pub fn by_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(&|e: &Element| e.has_class(class))
    }

    // --- Serialisation ---

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape(id));
        }
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.hidden {
            out.push_str(" style=\"display: none;\"");
        }
        out.push('>');
        if is_void(self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(&escape(t)),
                Node::Element(e) => e.write_html(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "meta" | "link")
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Ids of the page's fixed mount points.
pub mod ids {
    pub const HOME_VIEW: &str = "home-view";
    pub const ROLES_GRID: &str = "roles-grid";
    pub const SKILLS_GRID: &str = "skills-grid";
    pub const ROLES_STATUS: &str = "roles-status";
    pub const SEARCH_INPUT: &str = "search-input";
    pub const ROADMAP_VIEW: &str = "roadmap-view";
    pub const ROADMAP_HEADER: &str = "roadmap-header";
    pub const ROADMAP_TITLE: &str = "roadmap-title";
    pub const ROADMAP_DESC: &str = "roadmap-desc";
    pub const ROADMAP_TIME: &str = "roadmap-time";
    pub const ROLE_SCOPE: &str = "role-scope";
    pub const ROLE_COMPANIES: &str = "role-companies";
    pub const ROLE_SALARY: &str = "role-salary";
    pub const ROADMAP_CONTENT: &str = "roadmap-content";
    pub const BACK_TO_HOME: &str = "back-to-home";
    pub const NAV_HOME: &str = "nav-home";
    pub const NAV_PROJECTS: &str = "nav-projects";
    pub const PROJECTS_VIEW: &str = "projects-view";
    pub const PROJECT_SEARCH: &str = "project-search";
    pub const GLOBAL_FILTERS: &str = "global-filters";
    pub const GLOBAL_PROJECTS_GRID: &str = "global-projects-grid";
    pub const SKILL_MODAL: &str = "skill-modal";
    pub const CLOSE_MODAL: &str = "close-modal";
    pub const MODAL_BODY: &str = "modal-body";
}

/// The page: a root element whose fixed descendants are addressed by id.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Skeleton with every mount point the app renders into. Views start
    /// hidden; the router decides which one to show.
    pub fn page() -> Self {
        use crate::dom::ids::*;

        let nav = Element::new("nav").class("navbar").children([
            Element::new("a").with_id(NAV_HOME).attr("href", "/").text("Home"),
            Element::new("a")
                .with_id(NAV_PROJECTS)
                .attr("href", "/projects")
                .text("Projects"),
        ]);

        let home = Element::new("section")
            .with_id(HOME_VIEW)
            .hidden(true)
            .children([
                Element::new("input")
                    .with_id(SEARCH_INPUT)
                    .attr("type", "search")
                    .attr("placeholder", "Search roles and skills")
                    .attr("value", ""),
                Element::new("p").with_id(ROLES_STATUS).class("status"),
                Element::new("h2").text("Career Roles"),
                Element::new("div").with_id(ROLES_GRID).class("grid"),
                Element::new("h2").text("Skills"),
                Element::new("div").with_id(SKILLS_GRID).class("grid"),
            ]);

        let roadmap = Element::new("section")
            .with_id(ROADMAP_VIEW)
            .hidden(true)
            .children([
                Element::new("a")
                    .with_id(BACK_TO_HOME)
                    .attr("href", "/")
                    .text("Back to roles"),
                Element::new("header").with_id(ROADMAP_HEADER).children([
                    Element::new("h1").with_id(ROADMAP_TITLE),
                    Element::new("p").with_id(ROADMAP_DESC),
                ]),
                Element::new("aside").class("sidebar").children([
                    Element::new("h4").text("Career Scope"),
                    Element::new("p").with_id(ROLE_SCOPE),
                    Element::new("h4").text("Companies Hiring"),
                    Element::new("div").with_id(ROLE_COMPANIES).class("tags"),
                    Element::new("h4").text("Salary Range"),
                    Element::new("p").with_id(ROLE_SALARY),
                ]),
                Element::new("div").with_id(ROADMAP_CONTENT).class("roadmap-timeline"),
            ]);

        let projects = Element::new("section")
            .with_id(PROJECTS_VIEW)
            .hidden(true)
            .children([
                Element::new("input")
                    .with_id(PROJECT_SEARCH)
                    .attr("type", "search")
                    .attr("placeholder", "Search projects")
                    .attr("value", ""),
                Element::new("div")
                    .with_id(GLOBAL_FILTERS)
                    .class("global-filters"),
                Element::new("div")
                    .with_id(GLOBAL_PROJECTS_GRID)
                    .class("projects-grid"),
            ]);

        let modal = Element::new("div")
            .with_id(SKILL_MODAL)
            .class("modal")
            .hidden(true)
            .child(
                Element::new("div").class("modal-content").children([
                    Element::new("span")
                        .with_id(CLOSE_MODAL)
                        .class("close-modal")
                        .text("×"),
                    Element::new("div").with_id(MODAL_BODY),
                ]),
            );

        Self::new(
            Element::new("body").children([nav, home, roadmap, projects, modal]),
        )
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.root.by_id(id)
    }

    /// Mount point lookup; absence is a `MissingElement` error.
    pub fn mount(&mut self, id: &str) -> Result<&mut Element, ClientError> {
        self.root
            .by_id_mut(id)
            .ok_or_else(|| ClientError::MissingElement(id.to_string()))
    }

    pub fn element(&self, id: &str) -> Result<&Element, ClientError> {
        self.get(id)
            .ok_or_else(|| ClientError::MissingElement(id.to_string()))
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.root.remove_by_id(id)
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }
}
