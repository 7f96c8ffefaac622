use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Server configuration loaded explicitly from environment variables.
///
/// Redis URL is optional; without it every response is read from disk.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL. `None` disables response caching.
    pub redis_url: Option<String>,
    /// Directory holding `roadmaps/`, `skills/` and `projects.json`.
    pub content_dir: String,
    pub bind_addr: String,
    pub port: u16,
}

impl Config {
    /// Required:
    /// - `CONTENT_DIR`: content directory (must contain `roadmaps/index.json`)
    ///
    /// Optional:
    /// - `PORT` (default: 3000)
    /// - `BIND_ADDR` (default: "0.0.0.0")
    /// - `REDIS_URL`
    pub fn from_env() -> Result<Self, AppError> {
        let content_dir = std::env::var("CONTENT_DIR").map_err(|_| {
            AppError::Config("CONTENT_DIR environment variable is required".to_string())
        })?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("invalid PORT '{raw}': {e}")))?,
            Err(_) => 3000,
        };

        let config = Self {
            redis_url: std::env::var("REDIS_URL").ok(),
            content_dir,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let index = self.roadmap_index_path();
        if !index.exists() {
            return Err(AppError::Config(format!(
                "roadmap index not found at {}",
                index.display()
            )));
        }
        Ok(())
    }

    pub fn content_dir(&self) -> PathBuf {
        Path::new(&self.content_dir).to_path_buf()
    }

    pub fn roadmap_index_path(&self) -> PathBuf {
        self.content_dir().join("roadmaps").join("index.json")
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        let raw = format!("{}:{}", self.bind_addr, self.port);
        raw.parse()
            .map_err(|e| AppError::Config(format!("invalid listen address '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path) -> Config {
        Config {
            redis_url: None,
            content_dir: dir.to_string_lossy().to_string(),
            bind_addr: "127.0.0.1".to_string(),
            port: 3000,
        }
    }

    #[test]
    fn validate_requires_roadmap_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = config(dir.path()).validate().expect_err("missing index");
        assert!(err.to_string().contains("roadmap index not found"));

        std::fs::create_dir_all(dir.path().join("roadmaps")).expect("mkdir");
        std::fs::write(dir.path().join("roadmaps/index.json"), "[]").expect("write");
        config(dir.path()).validate().expect("index present");
    }

    #[test]
    fn listen_addr_combines_host_and_port() {
        let dir = tempfile::tempdir().expect("tempdir");
        let addr = config(dir.path()).listen_addr().expect("valid addr");
        assert_eq!(addr.port(), 3000);
    }
}
