use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the content API, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// JSON file holding completion progress. `None` keeps progress in memory.
    pub progress_file: Option<PathBuf>,
    /// Redis progress store; takes precedence over the file when reachable.
    pub redis_url: Option<String>,
    /// Simulates a restricted origin where history mutation is refused.
    pub restricted_origin: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: format!("roadmap-client/{}", env!("CARGO_PKG_VERSION")),
            progress_file: None,
            redis_url: None,
            restricted_origin: false,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Optional:
    /// - `ROADMAP_API_BASE_URL` (default: "http://localhost:3000")
    /// - `ROADMAP_TIMEOUT_SECS` (default: 15)
    /// - `ROADMAP_PROGRESS_FILE`
    /// - `REDIS_URL`
    /// - `ROADMAP_RESTRICTED_ORIGIN` ("1" or "true")
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("ROADMAP_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "ROADMAP_API_BASE_URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let timeout = match std::env::var("ROADMAP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ClientError::Config(format!("invalid ROADMAP_TIMEOUT_SECS '{raw}': {e}")))?,
            Err(_) => Duration::from_secs(15),
        };

        let restricted_origin = std::env::var("ROADMAP_RESTRICTED_ORIGIN")
            .map(|v| matches!(v.as_str(), "1" | "true"))
            .unwrap_or(false);

        Ok(Self {
            timeout,
            progress_file: std::env::var("ROADMAP_PROGRESS_FILE").ok().map(PathBuf::from),
            redis_url: std::env::var("REDIS_URL").ok(),
            restricted_origin,
            ..Self::with_base_url(&base_url)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let config = ClientConfig::with_base_url("http://api.local:8080/");
        assert_eq!(config.base_url, "http://api.local:8080");
        assert!(config.user_agent.starts_with("roadmap-client/"));
    }
}
