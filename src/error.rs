use thiserror::Error;

/// Failures that abort a traversal run. Optional-fact misses never appear
/// here; they are absorbed at the extraction site.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("page structure: {0} not found")]
    Structure(&'static str),
}
