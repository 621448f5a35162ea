//! Category discovery from the site's main navigation menu.
//!
//! Category items are the direct children of `#menu-main-menu` tagged
//! `menu-item-object-category`. Their links are resolved against the site
//! root. The tools section and the root itself are excluded and the result is
//! deduplicated in first-seen order. A menu without category items falls back
//! to every link it contains.

use super::fields::{all, first};
use crate::error::ScrapeError;
use crate::fetch::PageSource;
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

const MENU: &str = "#menu-main-menu";
const CATEGORY_ITEMS: &str = "#menu-main-menu > li.menu-item-object-category";
const TOOLS_PATH: &str = "/tools/";

/// Fetch the site root and list its category URLs.
///
/// Never fails: a fetch error, a bad root URL or a missing menu all give an
/// empty list.
#[instrument(level = "info", skip(source))]
pub async fn discover_categories<S: PageSource>(source: &S, root_url: &str) -> Vec<String> {
    let root = match Url::parse(root_url) {
        Ok(root) => root,
        Err(e) => {
            warn!(error = %e, "Root URL is not absolute; no categories");
            return Vec::new();
        }
    };

    let html = match source.fetch(root_url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Could not fetch site root");
            return Vec::new();
        }
    };

    let document = Html::parse_document(&html);
    match category_urls(&document, &root) {
        Ok(urls) => {
            info!(count = urls.len(), "Discovered category URLs");
            debug!(?urls, "Category URLs");
            urls
        }
        Err(e) => {
            warn!(error = %e, "Menu could not be read");
            Vec::new()
        }
    }
}

/// Category URLs from a parsed root page.
pub fn category_urls(document: &Html, root: &Url) -> Result<Vec<String>, ScrapeError> {
    let page = document.root_element();
    let Some(menu) = first(page, MENU)? else {
        return Ok(Vec::new());
    };

    let mut hrefs = Vec::new();
    for item in all(page, CATEGORY_ITEMS)? {
        if let Some(href) = first(item, "a[href]")?.and_then(|a| a.value().attr("href")) {
            hrefs.push(href);
        }
    }
    if hrefs.is_empty() {
        hrefs = all(menu, "a[href]")?
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .collect();
    }

    Ok(hrefs
        .into_iter()
        .filter_map(|href| root.join(href.trim()).ok())
        .filter(|url| !is_excluded(url, root))
        .map(String::from)
        .unique()
        .collect())
}

fn is_excluded(url: &Url, root: &Url) -> bool {
    url == root || url.path().starts_with(TOOLS_PATH)
}
