//! Read access to the static content directory.
//!
//! Layout:
//! - `roadmaps/index.json`: array of role/skill summaries
//! - `roadmaps/{id}.json`: roadmap documents
//! - `skills/{id}.json`: skill documents
//! - `projects.json`: global project catalogue
//!
//! Documents are passed through as raw JSON values so fields the server does
//! not know about still reach the client.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use roadmap_common::error::CommonError;
use roadmap_common::model::{Project, RoleSummary};
use roadmap_common::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Roadmap,
    Skill,
}

impl DocumentKind {
    pub fn dir(self) -> &'static str {
        match self {
            Self::Roadmap => "roadmaps",
            Self::Skill => "skills",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Roadmap => "roadmap",
            Self::Skill => "skill",
        }
    }
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"))
}

pub fn is_valid_id(id: &str) -> bool {
    id != "index" && id_re().is_match(id)
}

pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn summaries(&self) -> Result<Value, AppError> {
        let path = self.root.join("roadmaps").join("index.json");
        let value = read_json(&path).await?;
        // Shape check only; the raw value is what gets served.
        serde_json::from_value::<Vec<RoleSummary>>(value.clone()).map_err(CommonError::from)?;
        Ok(value)
    }

    /// Unknown or malformed ids are reported as not found.
    pub async fn document(&self, kind: DocumentKind, id: &str) -> Result<Value, AppError> {
        if !is_valid_id(id) {
            return Err(AppError::NotFound(format!("{} '{id}'", kind.label())));
        }
        let path = self.root.join(kind.dir()).join(format!("{id}.json"));
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(AppError::NotFound(format!("{} '{id}'", kind.label())));
        }
        read_json(&path).await
    }

    pub async fn projects_raw(&self) -> Result<Value, AppError> {
        let path = self.root.join("projects.json");
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Value::Array(Vec::new()));
        }
        read_json(&path).await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, AppError> {
        let raw = self.projects_raw().await?;
        let projects: Vec<Project> = serde_json::from_value(raw).map_err(CommonError::from)?;
        Ok(normalize::projects(projects))
    }

    /// SHA-256 over every JSON file (relative path and bytes), in path order.
    /// Used to decide whether cached responses are stale.
    pub async fn fingerprint(&self) -> Result<String, AppError> {
        let mut files = Vec::new();
        collect_json_files(&self.root, &mut files).await?;
        files.sort();

        let mut hasher = Sha256::new();
        for path in &files {
            let rel = path.strip_prefix(&self.root).unwrap_or(path);
            hasher.update(rel.to_string_lossy().as_bytes());
            hasher.update(b"\0");
            let bytes = tokio::fs::read(path).await.map_err(|source| AppError::Io {
                path: path.display().to_string(),
                source,
            })?;
            hasher.update(&bytes);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

async fn read_json(path: &Path) -> Result<Value, AppError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::Common(CommonError::InvalidContent(format!("{}: {e}", path.display())))
    })
}

async fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), AppError> {
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&current).await.map_err(|source| AppError::Io {
            path: current.display().to_string(),
            source,
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|source| AppError::Io {
            path: current.display().to_string(),
            source,
        })? {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                out.push(path);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Writes a small content tree used by the content and server tests.
    pub(crate) fn seed(dir: &Path) {
        std::fs::create_dir_all(dir.join("roadmaps")).expect("mkdir roadmaps");
        std::fs::create_dir_all(dir.join("skills")).expect("mkdir skills");
        std::fs::write(
            dir.join("roadmaps/index.json"),
            r#"[{"id":"frontend-developer","type":"role","title":"Frontend Developer","description":"Build UIs","icon":"🎨"},
                {"id":"git","type":"skill","title":"Git","description":"Version control"}]"#,
        )
        .expect("write index");
        std::fs::write(
            dir.join("roadmaps/frontend-developer.json"),
            r#"{"id":"frontend-developer","title":"Frontend Developer","description":"Build UIs",
                "roadmap":{"beginner":[{"topic":"HTML","status":"required","skillId":"html"}]}}"#,
        )
        .expect("write roadmap");
        std::fs::write(
            dir.join("skills/git.json"),
            r#"{"name":"Git","overview":"Track changes","prerequisites":["Shell"]}"#,
        )
        .expect("write skill");
        std::fs::write(
            dir.join("projects.json"),
            r#"[{"title":"Container Deploy","description":"Ship it","level":"Intermediate","techStack":["Docker","Node"]},
                {"title":"Portfolio","description":"Personal site","level":"Beginner","techStack":["HTML"]}]"#,
        )
        .expect("write projects");
    }

    #[test]
    fn id_validation_rejects_traversal() {
        assert!(is_valid_id("frontend-developer"));
        assert!(!is_valid_id("../secrets"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("index"));
    }

    #[tokio::test]
    async fn reads_documents_and_reports_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        seed(dir.path());
        let store = ContentStore::new(dir.path());

        let doc = store
            .document(DocumentKind::Roadmap, "frontend-developer")
            .await
            .expect("roadmap exists");
        assert_eq!(doc["title"], "Frontend Developer");

        let err = store
            .document(DocumentKind::Roadmap, "unknown-role")
            .await
            .expect_err("missing roadmap");
        assert!(matches!(err, AppError::NotFound(_)));

        let projects = store.projects().await.expect("projects");
        assert_eq!(projects.len(), 2);
    }

    #[tokio::test]
    async fn fingerprint_tracks_content_changes() {
        let dir = tempfile::tempdir().expect("tempdir");
        seed(dir.path());
        let store = ContentStore::new(dir.path());

        let before = store.fingerprint().await.expect("fingerprint");
        assert_eq!(before, store.fingerprint().await.expect("fingerprint"));

        std::fs::write(dir.path().join("skills/rust.json"), r#"{"name":"Rust"}"#).expect("write");
        assert_ne!(before, store.fingerprint().await.expect("fingerprint"));
    }
}
