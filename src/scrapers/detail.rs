//! Full article pages.
//!
//! One fetch per article, then every field extractor runs against the page.
//! A fetch failure is reported to the caller; a parse fault is not: the record
//! keeps whatever was populated before the fault.

use super::fields;
use crate::error::ScrapeError;
use crate::fetch::PageSource;
use crate::models::ArticleRecord;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html};
use tracing::{debug, error, info, instrument, warn};

/// Fetch `url` and extract a complete record from it.
///
/// # Errors
///
/// Only fetch-class errors; extraction itself never fails.
#[instrument(level = "info", skip(source))]
pub async fn scrape_article<S: PageSource>(
    source: &S,
    url: &str,
) -> Result<ArticleRecord, ScrapeError> {
    let body = source.fetch(url).await?;
    let document = Html::parse_document(&body);
    let record = extract_article(url, &document);
    debug!(
        title = record.title.as_deref().unwrap_or_default(),
        tags = record.tags.len(),
        images = record.content_images.len(),
        "Parsed article page"
    );
    Ok(record)
}

/// Fetch several articles one after the other, skipping failures.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn scrape_articles<S: PageSource>(source: &S, urls: Vec<String>) -> Vec<ArticleRecord> {
    let articles: Vec<ArticleRecord> = stream::iter(urls)
        .then(|url: String| async move {
            match scrape_article(source, &url).await {
                Ok(record) => Some(record),
                Err(e) => {
                    error!(error = %e, %url, "Article fetch failed");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(count = articles.len(), "Scraped article pages");
    articles
}

/// Extract every field from an already-parsed article page.
pub fn extract_article(url: &str, document: &Html) -> ArticleRecord {
    let mut record = ArticleRecord {
        url: Some(url.to_string()),
        ..Default::default()
    };
    if let Err(e) = populate(document.root_element(), &mut record) {
        warn!(%url, error = %e, "Extraction stopped early; keeping partial record");
    }
    record
}

// Header-derived fields come first; images and tags do not depend on the
// header and are still read when it is missing.
fn populate(root: ElementRef<'_>, record: &mut ArticleRecord) -> Result<(), ScrapeError> {
    record.title = fields::title(root)?;
    record.summary = fields::summary(root)?;
    record.author = fields::author(root)?;
    if let Some(date) = fields::date(root)? {
        record.date_display = date.display;
        record.date_iso = date.iso;
    }
    record.thumbnail = fields::thumbnail(root)?;
    record.content_images = fields::content_images(root)?;
    record.set_tags(fields::tags(root)?);
    Ok(())
}
