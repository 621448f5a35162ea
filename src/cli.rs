//! Command-line interface definitions.
//!
//! Global options can be provided as flags or environment variables; each
//! subcommand is one entry point into the scraping pipeline or the store.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Scrape every category and store new articles
/// bdm_scrape crawl
///
/// # One listing page, printed as JSON and stored
/// bdm_scrape listing https://www.blogdumoderateur.com/web/ --save
///
/// # Stored articles tagged "IA" since May 2023
/// bdm_scrape browse --category ia --from 2023-05-01
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the article store
    #[arg(short, long, env = "BDM_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Site root URL
    #[arg(short, long, env = "BDM_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the category URLs found in the site menu
    Categories,

    /// Scrape one listing page and the articles it links to
    Listing {
        url: String,
        /// Store the scraped articles
        #[arg(long)]
        save: bool,
    },

    /// Scrape individual article pages
    Article {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Store the scraped articles
        #[arg(long)]
        save: bool,
    },

    /// Discover categories, scrape every listing and store new articles
    Crawl {
        /// Use an in-memory store instead of the store directory
        #[arg(long)]
        dry_run: bool,
    },

    /// Filter stored articles
    Browse {
        /// Earliest date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Author contains
        #[arg(long)]
        author: Option<String>,
        /// Category or tag contains
        #[arg(long)]
        category: Option<String>,
        /// Title contains
        #[arg(long)]
        title: Option<String>,
    },
}
