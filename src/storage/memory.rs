use super::{ArticleStore, StoredArticle};
use crate::error::ScrapeError;
use crate::models::ArticleRecord;

/// In-process store with the same key semantics as [`super::JsonlStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Vec<StoredArticle>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArticleStore for MemoryStore {
    async fn find_one(&self, url: &str) -> Result<Option<ArticleRecord>, ScrapeError> {
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
        if self.find_one(url).await?.is_some() {
            return Err(ScrapeError::PersistenceConflict { url: url.clone() });
        }
        let id = self.articles.len() as u64 + 1;
        self.articles.push(StoredArticle { id, record });
        Ok(id)
    }

    async fn all(&self) -> Result<Vec<ArticleRecord>, ScrapeError> {
        Ok(self.articles.iter().map(|a| a.record.clone()).collect())
    }
}
