//! # BDM Scrape
//!
//! Scrapes the listing pages and article pages of a WordPress news site
//! (Blog du Modérateur by default), extracts structured article records and
//! stores them, deduplicated by URL, in a JSON-lines document store.
//!
//! ## Usage
//!
//! ```sh
//! bdm_scrape crawl
//! bdm_scrape browse --author doe --from 2023-05-01
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: find category URLs in the site's navigation menu
//! 2. **Listing**: read the article previews on each category page
//! 3. **Detail**: fetch each article page and merge it over its preview
//! 4. **Ingestion**: insert records whose URL is not stored yet
//!
//! Every request is awaited before the next one starts.

use clap::Parser;
use serde::Serialize;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod query;
mod scrapers;
mod storage;
mod utils;

use cli::{Cli, Command};
use config::Settings;
use fetch::{FetchConfig, HttpFetcher, PageSource};
use models::{ArticleEvent, ArticleOutcome, ArticleRecord, IngestReport};
use query::ArticleFilter;
use scrapers::{categories, detail, listing};
use storage::{ArticleStore, JsonlStore, MemoryStore, ingest};
use utils::truncate_for_log;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = Settings::resolve(&args).await?;
    info!(base_url = %settings.base_url, store_dir = %settings.store_dir.display(), "Settings resolved");

    let fetcher = HttpFetcher::new(&FetchConfig::default())?;

    match args.command {
        Command::Categories => {
            let urls = categories::discover_categories(&fetcher, &settings.base_url).await;
            if urls.is_empty() {
                warn!("No category URLs found");
            }
            for url in urls {
                println!("{url}");
            }
        }

        Command::Listing { url, save } => {
            // The store is opened before scraping so an unusable store halts the run early.
            let mut store = open_store_if(save, &settings).await?;
            let records = listing::scrape_listing(&fetcher, &url, log_event).await;
            print_json(&records)?;
            if let Some(store) = store.as_mut() {
                log_report(&url, ingest(store, &records).await);
            }
        }

        Command::Article { urls, save } => {
            let mut store = open_store_if(save, &settings).await?;
            let (valid, rejected): (Vec<_>, Vec<_>) = urls
                .into_iter()
                .partition(|u| u.starts_with(&settings.base_url));
            for url in &rejected {
                warn!(%url, base_url = %settings.base_url, "Not an article of this site; skipping");
            }

            let records = detail::scrape_articles(&fetcher, valid).await;
            for record in &records {
                debug!(
                    url = record.url.as_deref().unwrap_or_default(),
                    summary = %truncate_for_log(record.summary.as_deref().unwrap_or_default(), 120),
                    "Scraped article"
                );
            }
            warn_untitled(&records);
            print_json(&records)?;
            if let Some(store) = store.as_mut() {
                log_report("articles", ingest(store, &records).await);
            }
        }

        Command::Crawl { dry_run } => {
            let report = if dry_run {
                info!("Dry run: using an in-memory store");
                crawl(&fetcher, &settings, &mut MemoryStore::new()).await
            } else {
                let mut store = JsonlStore::open(&settings.store_dir, &settings.collection)
                    .await
                    .inspect_err(|e| error!(error = %e, "Article store unavailable; aborting before scraping"))?;
                crawl(&fetcher, &settings, &mut store).await
            };
            info!(
                inserted = report.inserted,
                skipped = report.skipped,
                failed = report.failed,
                "Overall ingestion summary"
            );
        }

        Command::Browse {
            from,
            to,
            author,
            category,
            title,
        } => {
            let store = JsonlStore::open(&settings.store_dir, &settings.collection).await?;
            let filter = ArticleFilter {
                from,
                to,
                author,
                category,
                title,
            };
            let matching = filter.apply(store.all().await?);
            info!(
                count = matching.len(),
                filtered = !filter.is_empty(),
                path = %store.path().display(),
                "Browsing stored articles"
            );
            print_json(&matching)?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// Scrape every category listing and ingest each one as it completes.
///
/// Falls back to the site root as the only listing when no category is found.
#[instrument(level = "info", skip_all, fields(base_url = %settings.base_url))]
async fn crawl<P, S>(source: &P, settings: &Settings, store: &mut S) -> IngestReport
where
    P: PageSource,
    S: ArticleStore,
{
    let mut listing_urls = categories::discover_categories(source, &settings.base_url).await;
    if listing_urls.is_empty() {
        warn!("No category URLs found; scraping the site root only");
        listing_urls.push(settings.base_url.clone());
    }
    info!(count = listing_urls.len(), "Listings to scrape");

    let mut total = IngestReport::default();
    for listing_url in &listing_urls {
        let records = listing::scrape_listing(source, listing_url, log_event).await;
        if records.is_empty() {
            warn!(%listing_url, "No articles scraped; moving on");
            continue;
        }
        let report = ingest(store, &records).await;
        log_report(listing_url, report);
        total.absorb(report);
    }
    total
}

async fn open_store_if(wanted: bool, settings: &Settings) -> Result<Option<JsonlStore>, error::ScrapeError> {
    if !wanted {
        return Ok(None);
    }
    JsonlStore::open(&settings.store_dir, &settings.collection)
        .await
        .map(Some)
}

fn log_event(event: &ArticleEvent) {
    let title = truncate_for_log(event.title.as_deref().unwrap_or_default(), 80);
    match event.outcome {
        ArticleOutcome::Merged => info!(
            index = event.index + 1,
            total = event.total,
            %title,
            "Article scraped"
        ),
        ArticleOutcome::PreviewOnly => warn!(
            index = event.index + 1,
            total = event.total,
            %title,
            "Article page unavailable; kept preview"
        ),
        ArticleOutcome::Dropped => debug!(
            index = event.index + 1,
            total = event.total,
            "Preview without url or title dropped"
        ),
    }
}

/// Warn about every record whose page yielded no title; returns how many.
fn warn_untitled(records: &[ArticleRecord]) -> usize {
    let mut untitled = 0;
    for record in records.iter().filter(|r| r.title.is_none()) {
        warn!(url = record.url.as_deref().unwrap_or_default(), "No title found on article page");
        untitled += 1;
    }
    untitled
}

fn log_report(scope: &str, report: IngestReport) {
    info!(
        %scope,
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        "Insertion summary"
    );
}

fn print_json<T: Serialize>(records: &[T]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}
