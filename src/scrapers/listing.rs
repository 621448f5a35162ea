//! Listing pages: previews enriched with their article pages.
//!
//! For every `<article class="post-N">` block in document order, the preview
//! is extracted, then (when it has a url) the article page is fetched and
//! merged over it. Requests are strictly sequential: a listing with N linked
//! articles costs N + 1 round trips.

use super::detail::scrape_article;
use super::preview::extract_preview;
use crate::error::ScrapeError;
use crate::fetch::PageSource;
use crate::models::{ArticleEvent, ArticleOutcome, ArticleRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument, warn};

static POST_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^post-\d+$").unwrap());

/// `<article>` elements carrying a `post-<number>` class token.
pub fn article_blocks(document: &Html) -> Result<Vec<ElementRef<'_>>, ScrapeError> {
    let articles = super::fields::all(document.root_element(), "article")?;
    Ok(articles
        .into_iter()
        .filter(|a| a.value().classes().any(|c| POST_CLASS.is_match(c)))
        .collect())
}

/// Parse a listing page into preview records, one per article block.
///
/// A block whose preview hits a parse fault yields `None` in its slot so
/// positions still line up with the page.
pub fn extract_previews(html: &str) -> Result<Vec<Option<ArticleRecord>>, ScrapeError> {
    let document = Html::parse_document(html);
    let previews = article_blocks(&document)?
        .into_iter()
        .enumerate()
        .map(|(index, block)| match extract_preview(block) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Preview extraction failed; skipping block");
                None
            }
        })
        .collect();
    Ok(previews)
}

/// Scrape one listing page and the article page behind each preview.
///
/// `on_event` is called once per article block with its outcome. Records
/// with neither a url nor a real title are dropped. A listing fetch failure
/// gives an empty result; an article fetch failure keeps the preview.
#[instrument(level = "info", skip(source, on_event))]
pub async fn scrape_listing<S, F>(source: &S, listing_url: &str, mut on_event: F) -> Vec<ArticleRecord>
where
    S: PageSource,
    F: FnMut(&ArticleEvent),
{
    let html = match source.fetch(listing_url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Listing fetch failed");
            return Vec::new();
        }
    };

    let previews = match extract_previews(&html) {
        Ok(previews) => previews,
        Err(e) => {
            warn!(error = %e, "Listing could not be parsed");
            return Vec::new();
        }
    };
    if previews.is_empty() {
        info!("No article blocks on listing page");
        return Vec::new();
    }

    let total = previews.len();
    info!(total, "Found article previews; fetching article pages");

    let mut records = Vec::new();
    for (index, preview) in previews.into_iter().enumerate() {
        let (record, outcome) = match preview {
            None => (None, ArticleOutcome::Dropped),
            Some(preview) => enrich(source, preview).await,
        };

        let event = ArticleEvent {
            index,
            total,
            url: record.as_ref().and_then(|r| r.url.clone()),
            title: record.as_ref().and_then(|r| r.title.clone()),
            outcome,
        };
        debug!(index, total, url = ?event.url, outcome = ?outcome, "Processed preview");
        on_event(&event);

        records.extend(record);
    }

    info!(kept = records.len(), total, "Listing scraped");
    records
}

async fn enrich<S: PageSource>(source: &S, preview: ArticleRecord) -> (Option<ArticleRecord>, ArticleOutcome) {
    let Some(url) = preview.url.clone() else {
        return if preview.is_keepable() {
            (Some(preview), ArticleOutcome::PreviewOnly)
        } else {
            (None, ArticleOutcome::Dropped)
        };
    };

    match scrape_article(source, &url).await {
        Ok(page) => (Some(ArticleRecord::merge(preview, page)), ArticleOutcome::Merged),
        Err(e) => {
            warn!(%url, error = %e, fetch = e.is_fetch(), "Article page unavailable; keeping preview");
            (Some(preview), ArticleOutcome::PreviewOnly)
        }
    }
}
