//! Extraction pipeline for the site.
//!
//! The pipeline works in two phases, like most listing-driven scrapers:
//!
//! 1. **Discovery**: find section URLs in the navigation menu ([`categories`])
//! 2. **Extraction**: for each listing page, read the article previews and
//!    enrich each one from its own article page ([`listing`], [`preview`],
//!    [`detail`])
//!
//! # Modules
//!
//! | Module | Input | Output |
//! |--------|-------|--------|
//! | [`fields`] | parsed page or block | one field each |
//! | [`preview`] | one listing block | partial record |
//! | [`detail`] | article URL | full record |
//! | [`categories`] | site root URL | category URLs |
//! | [`listing`] | listing URL | merged records |
//!
//! All network access goes through a [`crate::fetch::PageSource`] and is
//! awaited one request at a time. Failures are logged and skipped without
//! failing the batch.

pub mod categories;
pub mod detail;
pub mod fields;
pub mod listing;
pub mod preview;

#[cfg(test)]
pub(crate) mod fixtures;
