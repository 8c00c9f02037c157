use thiserror::Error;

/// Failures raised while walking the review feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service kept answering 503 for one page until the retry
    /// budget ran out.
    #[error("gave up on page {page} after {attempts} attempts (HTTP 503)")]
    RetriesExhausted { page: u32, attempts: u32 },

    #[error("malformed feed document: {0}")]
    Parse(String),
}

/// A single entry could not be flattened into a review record.
///
/// Extraction failures are per-entry; they never abort the page or the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entry {entry_id} is missing `{field}`")]
pub struct ExtractError {
    pub entry_id: String,
    pub field: &'static str,
}
