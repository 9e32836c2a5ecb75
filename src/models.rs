//! Data models for scraped links, normalized articles and the final report.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawLink`]: A candidate link as found on the listing page
//! - [`Article`]: One canonical record per unique article URL
//! - [`ReportEntry`]: An article selected for the report, plus fetched details
//! - [`Report`]: Everything printed to the console and written as JSON

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A candidate article link pulled from the listing page.
///
/// Links are raw: they may be relative, duplicated, or navigation noise.
/// [`crate::normalize::ArticleNormalizer`] decides which ones become articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// Link text as found in the anchor (untrimmed).
    pub title: String,
    /// The `href` attribute, absolute or site-relative.
    pub href: String,
    /// Origin used to absolutize site-relative `href`s.
    pub base_url: String,
    /// Date text found next to the link, empty if none.
    pub date_text: String,
}

impl RawLink {
    pub fn new(
        title: impl Into<String>,
        href: impl Into<String>,
        base_url: impl Into<String>,
        date_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            base_url: base_url.into(),
            date_text: date_text.into(),
        }
    }
}

/// A normalized news article.
///
/// The `url` is the identity of an article: the normalizer never produces two
/// articles with the same URL. Records are created once and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Trimmed link text.
    pub title: String,
    /// Absolute article URL.
    pub url: String,
    /// Supplementary text; empty when the listing carries none.
    pub description: String,
    /// The date text exactly as found next to the link.
    pub raw_date: String,
    /// The inferred publication time, `None` when no strategy matched.
    pub resolved_date: Option<DateTime<Local>>,
}

/// An article chosen for the report.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub article: Article,
    /// Leading text of the article page, if it was fetched.
    pub details: Option<String>,
}

/// The result of one run.
#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    /// The run date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The run time in `HH:MM:SS` format.
    pub local_time: String,
    /// Articles older than this were dropped.
    pub cutoff: DateTime<Local>,
    /// Width of the recency window in days.
    pub days_back: u64,
    /// Keywords an article had to contain.
    pub keywords: Vec<String>,
    /// Selected articles, in listing order.
    pub articles: Vec<ReportEntry>,
}
