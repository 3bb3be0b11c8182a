//! Error types shared by the upstream client and the addon responders.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure talking to the upstream site.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Failed to parse stream listing: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid playlist pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Client passed an id lacking the namespace prefix, or one that is not
    /// in the current snapshot.
    #[error("Unknown ID in {handler} handler: \"{id}\"")]
    UnknownId { handler: &'static str, id: String },

    #[error("Stream '{0}' has no source page")]
    MissingPage(String),

    #[error("Stream '{0}' has no valid start time")]
    InvalidStartTime(String),
}

impl Error {
    pub fn unknown_id(handler: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownId {
            handler,
            id: id.into(),
        }
    }
}
