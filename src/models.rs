//! Data models for scraped articles and pipeline bookkeeping.
//!
//! - [`ArticleRecord`]: one article as recovered from a listing preview, an
//!   article page, or both merged together
//! - [`ContentImage`]: an image found in an article body
//! - [`ArticleEvent`]: per-article progress emitted by the listing pipeline
//! - [`IngestReport`]: inserted/skipped/failed tallies for a stored batch
//!
//! Every field except the natural key is optional. `None` means "not found on
//! the page", which is distinct from an empty string.

use serde::{Deserialize, Serialize};

/// Title used by listing previews whose header has no heading.
pub const SENTINEL_TITLE: &str = "No Title Found";

/// An article as extracted from the site.
///
/// `url` is the natural key: two records are duplicates iff their url strings
/// are equal, byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Canonical article URL. Absent only for previews without a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The article "hat" (standfirst) paragraph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Human-readable date exactly as displayed on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_display: Option<String>,
    /// `YYYY-MM-DD`, only ever set from a parseable datetime attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_iso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// First tag on a full page, or the listing's "favtag" label as fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content_images: Vec<ContentImage>,
}

/// An image from the article body with its caption (or alt text).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContentImage {
    pub url: String,
    pub caption_or_alt: String,
}

impl ArticleRecord {
    /// Replace the tag list and derive `category` from its first element.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.category = tags.first().cloned();
        self.tags = tags;
    }

    /// Whether a listing record carries enough to be worth keeping: a url, or
    /// a real title (not the sentinel).
    pub fn is_keepable(&self) -> bool {
        self.url.is_some() || self.title.as_deref().is_some_and(|t| t != SENTINEL_TITLE)
    }

    /// Combine a listing preview with the record scraped from the article page.
    ///
    /// Page values win wherever they are populated. The preview's "favtag"
    /// category is used only when the page produced no tag-derived category.
    /// Dates travel as a pair so `date_display` and `date_iso` always describe
    /// the same timestamp.
    pub fn merge(preview: ArticleRecord, page: ArticleRecord) -> ArticleRecord {
        let page_has_date = page.date_display.is_some() || page.date_iso.is_some();
        let (date_display, date_iso) = if page_has_date {
            (page.date_display, page.date_iso)
        } else {
            (preview.date_display, preview.date_iso)
        };

        ArticleRecord {
            url: page.url.or(preview.url),
            title: page.title.or(preview.title),
            summary: page.summary.or(preview.summary),
            author: page.author.or(preview.author),
            date_display,
            date_iso,
            thumbnail: page.thumbnail.or(preview.thumbnail),
            category: page.category.or(preview.category),
            tags: page.tags,
            content_images: page.content_images,
        }
    }

    /// Short label for logs: the title if any, else the url.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("<untitled>")
    }
}

/// What happened to one article block on a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleOutcome {
    /// Preview and article page merged.
    Merged,
    /// The article page could not be fetched; the preview alone was kept.
    PreviewOnly,
    /// The block had neither a url nor a real title.
    Dropped,
}

/// Progress notification for one article block, in document order.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleEvent {
    /// Zero-based position of the block on the listing page.
    pub index: usize,
    pub total: usize,
    pub url: Option<String>,
    pub title: Option<String>,
    pub outcome: ArticleOutcome,
}

/// Tallies for one ingestion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl IngestReport {
    pub fn absorb(&mut self, other: IngestReport) {
        self.inserted += other.inserted;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview() -> ArticleRecord {
        ArticleRecord {
            url: Some("https://example.com/a/".to_string()),
            title: Some("Preview title".to_string()),
            thumbnail: Some("https://example.com/thumb-small.jpg".to_string()),
            category: Some("Réseaux sociaux".to_string()),
            date_display: Some("1 mai 2023".to_string()),
            date_iso: Some("2023-05-01".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_set_tags_derives_category() {
        let mut record = ArticleRecord::default();
        record.set_tags(vec!["IA".to_string(), "Outils".to_string()]);
        assert_eq!(record.category.as_deref(), Some("IA"));

        record.set_tags(vec![]);
        assert_eq!(record.category, None);
    }

    #[test]
    fn test_is_keepable() {
        let sentinel = ArticleRecord {
            title: Some(SENTINEL_TITLE.to_string()),
            ..Default::default()
        };
        assert!(!sentinel.is_keepable());
        assert!(!ArticleRecord::default().is_keepable());

        let titled = ArticleRecord {
            title: Some("Real".to_string()),
            ..Default::default()
        };
        assert!(titled.is_keepable());

        let linked = ArticleRecord {
            url: Some("https://example.com/x/".to_string()),
            title: Some(SENTINEL_TITLE.to_string()),
            ..Default::default()
        };
        assert!(linked.is_keepable());
    }

    #[test]
    fn test_merge_prefers_page_values() {
        let mut page = ArticleRecord {
            url: Some("https://example.com/a/".to_string()),
            title: Some("Page title".to_string()),
            author: Some("Jane Doe".to_string()),
            thumbnail: Some("https://example.com/hero.jpg".to_string()),
            date_display: Some("2 mai 2023".to_string()),
            date_iso: None,
            ..Default::default()
        };
        page.set_tags(vec!["IA".to_string()]);

        let merged = ArticleRecord::merge(preview(), page);
        assert_eq!(merged.title.as_deref(), Some("Page title"));
        assert_eq!(merged.author.as_deref(), Some("Jane Doe"));
        assert_eq!(merged.thumbnail.as_deref(), Some("https://example.com/hero.jpg"));
        assert_eq!(merged.category.as_deref(), Some("IA"));
        assert_eq!(merged.date_display.as_deref(), Some("2 mai 2023"));
        assert_eq!(merged.date_iso, None);
    }

    #[test]
    fn test_merge_falls_back_to_preview() {
        let page = ArticleRecord {
            url: Some("https://example.com/a/".to_string()),
            summary: Some("Hat".to_string()),
            ..Default::default()
        };

        let merged = ArticleRecord::merge(preview(), page);
        assert_eq!(merged.title.as_deref(), Some("Preview title"));
        assert_eq!(merged.summary.as_deref(), Some("Hat"));
        assert_eq!(merged.category.as_deref(), Some("Réseaux sociaux"));
        assert_eq!(merged.date_iso.as_deref(), Some("2023-05-01"));
        assert!(merged.tags.is_empty());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let record = ArticleRecord {
            url: Some("https://example.com/a/".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("author"));
        assert!(json.contains("\"tags\":[]"));

        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_ingest_report_absorb() {
        let mut total = IngestReport::default();
        total.absorb(IngestReport { inserted: 2, skipped: 1, failed: 0 });
        total.absorb(IngestReport { inserted: 0, skipped: 3, failed: 1 });
        assert_eq!(total, IngestReport { inserted: 2, skipped: 4, failed: 1 });
    }
}
