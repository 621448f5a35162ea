//! Document store for scraped articles.
//!
//! The store is keyed by article url. Ingestion is find-then-insert per
//! record rather than an upsert: a record whose url is already stored is
//! skipped, never updated. A record without a url is never stored. This is only race-free with a single writer, which
//! is the only mode the pipeline runs in.
//!
//! # Backends
//!
//! - [`JsonlStore`]: append-only JSON-lines file on disk
//! - [`MemoryStore`]: in-process, for dry runs and tests

mod jsonl;
mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use crate::error::ScrapeError;
use crate::models::{ArticleRecord, IngestReport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// A stored article with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredArticle {
    pub id: u64,
    #[serde(flatten)]
    pub record: ArticleRecord,
}

/// Find/insert access to stored articles.
pub trait ArticleStore {
    /// The stored record with exactly this url, if any.
    async fn find_one(&self, url: &str) -> Result<Option<ArticleRecord>, ScrapeError>;

    /// Store a new record and return its id.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::PersistenceConflict`] if the url is already stored,
    /// [`ScrapeError::MissingUrl`] if the record has no url.
    async fn insert(&mut self, record: ArticleRecord) -> Result<u64, ScrapeError>;

    /// Every stored record, in insertion order.
    async fn all(&self) -> Result<Vec<ArticleRecord>, ScrapeError>;
}

/// Store each record unless its url is already present.
///
/// Records without a url count as failed and are not stored. Conflicts
/// count as skipped; any other store error counts as failed and the batch
/// continues.
#[instrument(level = "info", skip_all, fields(count = records.len()))]
pub async fn ingest<S: ArticleStore>(store: &mut S, records: &[ArticleRecord]) -> IngestReport {
    let mut report = IngestReport::default();

    for record in records {
        let Some(url) = record.url.as_deref() else {
            warn!(title = record.label(), "Article has no url; not storing");
            report.failed += 1;
            continue;
        };

        match store.find_one(url).await {
            Ok(Some(_)) => {
                debug!(%url, "Already stored; skipping");
                report.skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(%url, error = %e, "Lookup failed");
                report.failed += 1;
                continue;
            }
        }

        match store.insert(record.clone()).await {
            Ok(id) => {
                debug!(id, title = record.label(), "Inserted article");
                report.inserted += 1;
            }
            Err(ScrapeError::PersistenceConflict { url }) => {
                debug!(%url, "Conflict on insert; skipping");
                report.skipped += 1;
            }
            Err(e) => {
                warn!(title = record.label(), error = %e, "Insert failed");
                report.failed += 1;
            }
        }
    }

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        "Ingestion finished"
    );
    report
}
