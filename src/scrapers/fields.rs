//! Field extractors for article pages.
//!
//! Each extractor locates one semantic field by walking a chain of containers
//! identified by tag and class token, then reading text or an attribute. A
//! missing link in the chain yields `Ok(None)` (or an empty list); it never
//! errors. `Err` is reserved for a [`ScrapeError::ParseFault`], which the
//! callers treat as "stop here, keep what you have".
//!
//! Text fields are trimmed and every internal whitespace run (newlines and
//! indentation between inline elements included) is collapsed to one space.
//! Attribute values such as URLs are only trimmed.
//!
//! Extractors take an [`ElementRef`] scope so they apply equally to a whole
//! document (`Html::root_element`) or to one block of a listing page.

use crate::error::ScrapeError;
use crate::models::ContentImage;
use chrono::NaiveDate;
use scraper::{ElementRef, Selector};

/// `Ok(None)` = not on the page; `Err` = parse fault.
pub type Field<T> = Result<Option<T>, ScrapeError>;

pub(crate) const ARTICLE_HEADER: &str = "header.entry-header";
const META_INFO: &str = "div.meta-info";
const BYLINE_LINK: &str = "span.byline a";
const SOCIAL_CONTENT: &str = "div.social-content";
const POSTED_ON: &str = "span.posted-on";
pub(crate) const TIME: &str = "time.published, time.entry-date";
const HEADER_IMAGE: &str = "figure.article-header-image";
const CONTENT: &str = "div.entry-content";
const TERMS: &str = "div.article-terms";
const TAGS_LIST: &str = "ul.tags-list";
const TAG_LINK: &str = "a.post-tags";

const LAZY_SRC: &str = "data-lazy-src";
const INLINE_DATA_SCHEME: &str = "data:";

/// Compile a selector, reporting failure as a parse fault.
pub(crate) fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::ParseFault {
        context: "selector",
        detail: format!("{css}: {e}"),
    })
}

/// First descendant of `scope` matching `css`.
pub(crate) fn first<'a>(scope: ElementRef<'a>, css: &str) -> Field<ElementRef<'a>> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).next())
}

/// Every descendant of `scope` matching `css`, in document order.
pub(crate) fn all<'a>(scope: ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>, ScrapeError> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).collect())
}

/// Visible text with surrounding and repeated whitespace removed.
pub(crate) fn clean_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-empty cleaned text, or `None`.
pub(crate) fn text_of(el: ElementRef<'_>) -> Option<String> {
    Some(clean_text(el)).filter(|t| !t.is_empty())
}

/// Image URL, preferring the lazy-load attribute over `src`.
pub(crate) fn image_source(img: ElementRef<'_>) -> Option<String> {
    let attr = |name| img.value().attr(name).map(str::trim).filter(|v| !v.is_empty());
    attr(LAZY_SRC).or_else(|| attr("src")).map(str::to_string)
}

/// A page date: the displayed text plus a normalized calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDate {
    pub display: Option<String>,
    pub iso: Option<String>,
}

/// Normalize a `datetime` attribute to `YYYY-MM-DD`.
///
/// Accepts `2023-05-01T10:00:00`, `2023-05-01 10:00:00`, a bare date and any
/// trailing offset; anything that does not start with a valid calendar date
/// yields `None`.
pub fn parse_iso_date(raw: &str) -> Option<String> {
    let normalized = raw.trim().replacen(' ', "T", 1);
    let day = normalized.split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Read display text and `datetime` from a `<time>` element.
pub(crate) fn read_time(time: ElementRef<'_>) -> PostDate {
    PostDate {
        display: text_of(time),
        iso: time.value().attr("datetime").and_then(parse_iso_date),
    }
}

/// Title: `header.entry-header` → `h1.entry-title`.
pub fn title(scope: ElementRef<'_>) -> Field<String> {
    let Some(header) = first(scope, ARTICLE_HEADER)? else {
        return Ok(None);
    };
    Ok(first(header, "h1.entry-title")?.and_then(text_of))
}

/// Summary: the first paragraph of the `div.article-hat`.
pub fn summary(scope: ElementRef<'_>) -> Field<String> {
    let Some(hat) = first(scope, "div.article-hat")? else {
        return Ok(None);
    };
    Ok(first(hat, "p")?.and_then(text_of))
}

fn byline_in(container: ElementRef<'_>) -> Field<String> {
    let Some(meta) = first(container, META_INFO)? else {
        return Ok(None);
    };
    Ok(first(meta, BYLINE_LINK)?.and_then(text_of))
}

/// Author: the byline link in the article header, else in the social block.
pub fn author(scope: ElementRef<'_>) -> Field<String> {
    if let Some(header) = first(scope, ARTICLE_HEADER)? {
        if let Some(name) = byline_in(header)? {
            return Ok(Some(name));
        }
    }
    match first(scope, SOCIAL_CONTENT)? {
        Some(social) => byline_in(social),
        None => Ok(None),
    }
}

/// Date: header meta info → `span.posted-on` → `time.published|entry-date`.
pub fn date(scope: ElementRef<'_>) -> Field<PostDate> {
    let Some(header) = first(scope, ARTICLE_HEADER)? else {
        return Ok(None);
    };
    let Some(meta) = first(header, META_INFO)? else {
        return Ok(None);
    };
    let Some(posted_on) = first(meta, POSTED_ON)? else {
        return Ok(None);
    };
    Ok(first(posted_on, TIME)?.map(read_time))
}

/// Thumbnail: the image of the `figure.article-header-image`.
pub fn thumbnail(scope: ElementRef<'_>) -> Field<String> {
    let Some(figure) = first(scope, HEADER_IMAGE)? else {
        return Ok(None);
    };
    Ok(first(figure, "img")?.and_then(image_source))
}

fn usable_source(img: ElementRef<'_>) -> Option<String> {
    image_source(img).filter(|url| !url.starts_with(INLINE_DATA_SCHEME))
}

fn alt_of(img: ElementRef<'_>) -> String {
    img.value().attr("alt").map(str::trim).unwrap_or_default().to_string()
}

/// Content images from `div.entry-content`.
///
/// When the container holds at least one `<figure>`, only figures are read
/// (one image each, captioned by `<figcaption>` or else alt text). Otherwise
/// every `<img>` is read with its alt text. Images without a usable URL or
/// with an inline `data:` URL are dropped.
pub fn content_images(scope: ElementRef<'_>) -> Result<Vec<ContentImage>, ScrapeError> {
    let Some(content) = first(scope, CONTENT)? else {
        return Ok(Vec::new());
    };

    let figures = all(content, "figure")?;
    let mut images = Vec::new();

    if figures.is_empty() {
        for img in all(content, "img")? {
            if let Some(url) = usable_source(img) {
                images.push(ContentImage {
                    url,
                    caption_or_alt: alt_of(img),
                });
            }
        }
        return Ok(images);
    }

    for figure in figures {
        let Some(img) = first(figure, "img")? else {
            continue;
        };
        let Some(url) = usable_source(img) else {
            continue;
        };
        let caption_or_alt = match first(figure, "figcaption")? {
            Some(caption) => clean_text(caption),
            None => alt_of(img),
        };
        images.push(ContentImage { url, caption_or_alt });
    }
    Ok(images)
}

/// Tags: `div.article-terms` → `ul.tags-list` → each `a.post-tags`.
pub fn tags(scope: ElementRef<'_>) -> Result<Vec<String>, ScrapeError> {
    let Some(terms) = first(scope, TERMS)? else {
        return Ok(Vec::new());
    };
    let Some(list) = first(terms, TAGS_LIST)? else {
        return Ok(Vec::new());
    };
    Ok(all(list, TAG_LINK)?.into_iter().filter_map(text_of).collect())
}
