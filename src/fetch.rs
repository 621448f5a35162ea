//! HTML document access.
//!
//! Every page the pipeline reads goes through a [`PageSource`]. The production
//! implementation, [`HttpFetcher`], performs one GET per call with a fixed
//! identification header and timeout; there are no retries and no rate
//! limiting. Callers treat any error as "skip this page".
//!
//! # Architecture
//!
//! - [`PageSource`]: async trait returning raw markup for a URL
//! - [`FetchConfig`]: the identification headers and timeout, built once
//! - [`HttpFetcher`]: `reqwest` client configured from a [`FetchConfig`]

use crate::error::ScrapeError;
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Browser identification sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can turn a URL into page markup.
pub trait PageSource {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Fetch`] on network failure, [`ScrapeError::Status`] on a
    /// non-2xx answer.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Deployment constants for outbound requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: &'static str,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl FetchConfig {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fr-FR,fr;q=0.9,en;q=0.8"));
        headers
    }
}

/// [`PageSource`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build the client with the headers and timeout from `config`.
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .default_headers(config.headers())
            .timeout(config.timeout)
            .build()
            .map_err(|source| ScrapeError::Fetch {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let t0 = Instant::now();
        let fetch_err = |source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Non-success status");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(fetch_err)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
