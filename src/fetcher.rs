use std::time::Duration;

use tracing::debug;

use crate::error::ScrapeError;

pub const DEFAULT_BASE_URL: &str = "http://www.findagrave.com/cgi-bin/fg.cgi?page=gr&GRid=";

// Browser-like User-Agent; the site blocks default client strings.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// One memorial page per identifier. Traversal tests substitute a
/// fixture-backed source through this seam.
pub trait RecordSource {
    fn fetch(&self, id: &str) -> Result<String, ScrapeError>;
}

pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(ScrapeError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl RecordSource for HttpSource {
    fn fetch(&self, id: &str) -> Result<String, ScrapeError> {
        // The identifier is appended as-is; no escaping beyond what it carries.
        let url = format!("{}{}", self.base_url, id);
        debug!(%url, "fetching memorial page");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ScrapeError::Fetch {
                url: url.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { url, status });
        }

        resp.text().map_err(|e| ScrapeError::Fetch { url, source: e })
    }
}
