/// Client-side failure taxonomy.
///
/// `Clone` because fetch results are shared between coalesced callers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The API answered non-2xx for a requested id.
    #[error("{0} not found")]
    NotFound(String),

    /// Transport, status or decoding failure.
    #[error("{0}")]
    RequestFailed(String),

    /// An expected mount point is absent from the document.
    #[error("element not found: #{0}")]
    MissingElement(String),

    /// The history backend refused a push (restricted origin).
    #[error("history update refused for {0}")]
    HistoryRefused(String),

    #[error("progress storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
