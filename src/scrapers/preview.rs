//! Listing-page previews.
//!
//! A listing page shows, per article block, a link, a heading, a thumbnail, a
//! "favtag" section label and a date. Summary, author, tags and body images
//! only exist on the article page itself and stay empty here.

use super::fields::{self, ARTICLE_HEADER, TIME, first, image_source, read_time, text_of};
use crate::error::ScrapeError;
use crate::models::{ArticleRecord, SENTINEL_TITLE};
use scraper::ElementRef;

const PREVIEW_META: &str = "div.entry-meta";

/// Extract the preview fields of one `<article>` block.
///
/// `title` falls back to [`SENTINEL_TITLE`] when the header has no heading;
/// `url` is left absent when the header has no link.
pub fn extract_preview(block: ElementRef<'_>) -> Result<ArticleRecord, ScrapeError> {
    let mut record = ArticleRecord::default();

    let header = first(block, ARTICLE_HEADER)?;
    if let Some(header) = header {
        record.url = first(header, "a")?
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string);
        record.title = first(header, "h3.entry-title")?.and_then(text_of);
    }
    if record.title.is_none() {
        record.title = Some(SENTINEL_TITLE.to_string());
    }

    if let Some(thumb) = first(block, "div.post-thumbnail")? {
        record.thumbnail = first(thumb, "img")?.and_then(image_source);
    }

    if let Some(meta) = first(block, PREVIEW_META)? {
        record.category = first(meta, "span.favtag")?.and_then(text_of);
    }
    if let Some(date) = preview_date(block)? {
        record.date_display = date.display;
        record.date_iso = date.iso;
    }

    Ok(record)
}

/// The block's `<time>` inside its own `div.entry-meta`, read with the same
/// rule as article pages.
pub fn preview_date(block: ElementRef<'_>) -> fields::Field<fields::PostDate> {
    let Some(meta) = first(block, PREVIEW_META)? else {
        return Ok(None);
    };
    Ok(first(meta, TIME)?.map(read_time))
}
