//! Error taxonomy for the scraping pipeline.
//!
//! Fetch failures and parse faults are recoverable: callers downgrade them to
//! an absent field or a skipped item. A persistence conflict is an expected
//! outcome of ingestion and is tallied, not propagated. Only failing to open
//! the document store halts a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Network-level failure (DNS, connect, timeout, body read).
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Unexpected markup shape or an unusable selector.
    #[error("parse fault in {context}: {detail}")]
    ParseFault { context: &'static str, detail: String },

    /// A record with the same url is already stored.
    #[error("an article with url {url} is already stored")]
    PersistenceConflict { url: String },

    /// A record without a url has no key to store it under.
    #[error("article \"{title}\" has no url and cannot be stored")]
    MissingUrl { title: String },

    #[error("document store at {path} is unusable: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize a stored record: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid configuration in {path}: {detail}")]
    Config { path: PathBuf, detail: String },
}

impl ScrapeError {
    /// Whether this error belongs to the fetch class (network or status).
    pub fn is_fetch(&self) -> bool {
        matches!(self, ScrapeError::Fetch { .. } | ScrapeError::Status { .. })
    }
}
