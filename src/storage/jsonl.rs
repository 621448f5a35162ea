//! JSON-lines document store.
//!
//! One [`StoredArticle`] per line in `<dir>/<collection>.jsonl`. The file is
//! read once when the store is opened and only ever appended to afterwards.

use super::{ArticleStore, StoredArticle};
use crate::error::ScrapeError;
use crate::models::ArticleRecord;
use crate::utils::ensure_writable_dir;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    articles: Vec<StoredArticle>,
    urls: HashSet<String>,
    next_id: u64,
}

impl JsonlStore {
    /// Open (or create) the collection file under `dir`.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Store`] if the directory cannot be created or written
    /// to, or the existing file cannot be read. Unparseable lines are logged
    /// and ignored.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display(), %collection))]
    pub async fn open(dir: impl AsRef<Path>, collection: &str) -> Result<Self, ScrapeError> {
        let dir = dir.as_ref();
        ensure_writable_dir(dir).await?;
        let path = dir.join(format!("{collection}.jsonl"));

        let mut store = Self {
            path,
            articles: Vec::new(),
            urls: HashSet::new(),
            next_id: 1,
        };

        let contents = match fs::read_to_string(&store.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ScrapeError::Store {
                    path: store.path,
                    source,
                });
            }
        };

        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredArticle>(line) {
                Ok(stored) => store.remember(stored),
                Err(e) => warn!(line = lineno + 1, error = %e, "Ignoring unreadable stored record"),
            }
        }

        info!(path = %store.path.display(), count = store.articles.len(), "Opened article store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn remember(&mut self, stored: StoredArticle) {
        self.next_id = self.next_id.max(stored.id.saturating_add(1));
        if let Some(url) = &stored.record.url {
            self.urls.insert(url.clone());
        }
        self.articles.push(stored);
    }

    async fn append(&self, stored: &StoredArticle) -> Result<(), ScrapeError> {
        let mut line = serde_json::to_string(stored)?;
        line.push('\n');

        let store_err = |source| ScrapeError::Store {
            path: self.path.clone(),
            source,
        };
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(store_err)?;
        file.write_all(line.as_bytes()).await.map_err(store_err)?;
        file.flush().await.map_err(store_err)?;
        Ok(())
    }
}

impl ArticleStore for JsonlStore {
    async fn find_one(&self, url: &str) -> Result<Option<ArticleRecord>, ScrapeError> {
        if !self.urls.contains(url) {
            return Ok(None);
        }
        Ok(self
            .articles
            .iter()
            .find(|a| a.record.url.as_deref() == Some(url))
            .map(|a| a.record.clone()))
    }

    async fn insert(&mut self, record: ArticleRecord) -> Result<u64, ScrapeError> {
        let Some(url) = &record.url else {
            return Err(ScrapeError::MissingUrl {
                title: record.label().to_string(),
            });
        };
        if self.urls.contains(url) {
            return Err(ScrapeError::PersistenceConflict { url: url.clone() });
        }

        let stored = StoredArticle {
            id: self.next_id,
            record,
        };
        self.append(&stored).await?;

        let id = stored.id;
        self.remember(stored);
        Ok(id)
    }

    async fn all(&self) -> Result<Vec<ArticleRecord>, ScrapeError> {
        Ok(self.articles.iter().map(|a| a.record.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            url: Some(url.to_string()),
            title: Some("Titre".to_string()),
            tags: vec!["IA".to_string()],
            category: Some("IA".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = JsonlStore::open(dir.path(), "articles").await.unwrap();
        assert_eq!(store.insert(record("https://example.com/a/")).await.unwrap(), 1);
        assert_eq!(store.insert(record("https://example.com/b/")).await.unwrap(), 2);
        drop(store);

        let mut reopened = JsonlStore::open(dir.path(), "articles").await.unwrap();
        assert_eq!(reopened.all().await.unwrap().len(), 2);
        assert!(reopened.find_one("https://example.com/b/").await.unwrap().is_some());
        assert_eq!(reopened.insert(record("https://example.com/c/")).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(dir.path(), "articles").await.unwrap();
        store.insert(record("https://example.com/a/")).await.unwrap();

        let err = store.insert(record("https://example.com/a/")).await.unwrap_err();
        assert!(matches!(err, ScrapeError::PersistenceConflict { .. }));
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.jsonl");
        std::fs::write(
            &path,
            "{\"id\":4,\"url\":\"https://example.com/a/\",\"tags\":[],\"content_images\":[]}\nnot json\n\n",
        )
        .unwrap();

        let mut store = JsonlStore::open(dir.path(), "articles").await.unwrap();
        assert_eq!(store.all().await.unwrap().len(), 1);
        assert_eq!(store.insert(record("https://example.com/z/")).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_insert_without_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(dir.path(), "articles").await.unwrap();

        let err = store.insert(ArticleRecord::default()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::MissingUrl { .. }));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_max_stored_id_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("articles.jsonl"),
            "{\"id\":18446744073709551615,\"url\":\"https://example.com/a/\",\"tags\":[],\"content_images\":[]}\n",
        )
        .unwrap();

        let store = JsonlStore::open(dir.path(), "articles").await.unwrap();
        assert_eq!(store.all().await.unwrap().len(), 1);
        assert_eq!(store.next_id, u64::MAX);
    }

    #[tokio::test]
    async fn test_open_fails_on_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let err = JsonlStore::open(blocker.join("sub"), "articles").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Store { .. }));
    }
}
