/// Error types shared across the roadmap crates.
///
/// Content decoding failures common to both the API server and the client.
/// Crate-specific errors wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("invalid content JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid content: {0}")]
    InvalidContent(String),
}
