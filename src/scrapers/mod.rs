//! Listing page scrapers.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Indexing**: Fetch the listing page and turn every candidate anchor
//!    into a [`crate::models::RawLink`]
//! 2. **Enrichment**: After filtering, fetch each selected article page for a
//!    short excerpt
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Kabutan | [`kabutan`] | HTML scraping | Earnings news listing; dates often only in the URL |
//!
//! Scrapers use:
//! - A [`crate::fetch::PageFetch`] implementation, so tests run on fixtures
//! - Graceful error handling for article pages (failed fetches are logged and skipped)

pub mod kabutan;
