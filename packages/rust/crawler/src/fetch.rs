//! HTTP fetcher shared by both discovery strategies.
//!
//! The fetcher is an explicitly constructed object passed into the crawl —
//! never a global singleton — so tests and callers control timeout,
//! redirect, and user-agent policy per run.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use sitekb_shared::{Result, SitekbError};

/// Default User-Agent string for crawl requests.
const USER_AGENT: &str = concat!("sitekb/", env!("CARGO_PKG_VERSION"));

/// HTTP policy for a crawl run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum redirect hops to follow.
    pub max_redirects: usize,
    /// User-Agent override; the versioned default is used when `None`.
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_redirects: 5,
            user_agent: None,
        }
    }
}

/// Retrieves raw HTML (or sitemap XML) for one URL over HTTP(S).
///
/// No retries are applied at this layer: a failed fetch surfaces as a
/// [`SitekbError::Fetch`] whose message includes the requested URL, and the
/// caller records it as a per-URL crawl error. Connections are kept alive
/// across requests via the underlying client.
pub struct HtmlFetcher {
    client: Client,
}

impl HtmlFetcher {
    /// Build a fetcher with the given policy.
    pub fn new(opts: &FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(opts.user_agent.as_deref().unwrap_or(USER_AGENT))
            .redirect(reqwest::redirect::Policy::limited(opts.max_redirects))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| SitekbError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch one URL and return the response body as text.
    ///
    /// Errors on network failure, timeout, non-2xx status, or a clearly
    /// non-text body (binary content type).
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SitekbError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitekbError::Fetch(format!("{url}: HTTP {status}")));
        }

        if let Some(ct) = response.headers().get(CONTENT_TYPE) {
            let ct = ct.to_str().unwrap_or("").to_ascii_lowercase();
            if !is_text_content_type(&ct) {
                return Err(SitekbError::Fetch(format!(
                    "{url}: non-text content type '{ct}'"
                )));
            }
        }

        response
            .text()
            .await
            .map_err(|e| SitekbError::Fetch(format!("{url}: body read failed: {e}")))
    }
}

/// Accept anything a tolerant HTML/XML parser can work with.
fn is_text_content_type(ct: &str) -> bool {
    ct.is_empty()
        || ct.starts_with("text/")
        || ct.contains("html")
        || ct.contains("xml")
        || ct.contains("json")
}
