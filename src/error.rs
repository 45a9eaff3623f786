use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// No author record for the given email or ENID. Callers should treat
    /// this as an empty result, not a fault.
    #[error("author not found: {0}")]
    AuthorNotFound(String),

    /// The author exists but matches no publications.
    #[error("author {enid} has no matching publications")]
    NoContributions { enid: u64 },

    #[error("storage read failed: {0}")]
    Storage(String),

    #[error("invalid author pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StatsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::AuthorNotFound(_))
    }

    pub fn is_no_contributions(&self) -> bool {
        matches!(self, StatsError::NoContributions { .. })
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
