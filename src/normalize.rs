//! Turning raw listing links into canonical articles.
//!
//! [`ArticleNormalizer`] absolutizes each link, drops anything that does not
//! look like a news article, and keeps exactly one [`Article`] per URL. The
//! first occurrence of a URL wins and output order follows input order, so
//! repeated runs over the same links give the same result.

use crate::config::{DEFAULT_MIN_TITLE_LENGTH, default_noise_markers, default_url_markers};
use crate::dates::DateResolver;
use crate::models::{Article, RawLink};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use tracing::{debug, info, instrument};

/// Why a raw link was not turned into an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotNews,
    EmptyTitle,
    ShortTitle,
    Navigation,
}

/// Builds the deduplicated article list from raw links.
#[derive(Debug, Clone)]
pub struct ArticleNormalizer {
    site_origin: String,
    url_markers: Vec<String>,
    noise_markers: Vec<String>,
    min_title_length: usize,
    resolver: DateResolver,
}

impl ArticleNormalizer {
    /// Create a normalizer with the default markers and title length.
    pub fn new(site_origin: impl Into<String>, resolver: DateResolver) -> Self {
        Self {
            site_origin: site_origin.into(),
            url_markers: default_url_markers(),
            noise_markers: default_noise_markers(),
            min_title_length: DEFAULT_MIN_TITLE_LENGTH,
            resolver,
        }
    }

    /// URLs must contain one of these substrings.
    pub fn with_url_markers(mut self, markers: Vec<String>) -> Self {
        self.url_markers = markers;
        self
    }

    /// Titles containing one of these substrings are navigation, not news.
    pub fn with_noise_markers(mut self, markers: Vec<String>) -> Self {
        self.noise_markers = markers;
        self
    }

    /// Minimum title length in characters.
    pub fn with_min_title_length(mut self, len: usize) -> Self {
        self.min_title_length = len;
        self
    }

    /// Absolute form of `href`. Site-relative links are joined to the link's
    /// own base URL, or to the configured origin when it has none.
    pub fn absolutize(&self, href: &str, base_url: &str) -> String {
        if href.starts_with('/') {
            let origin = if base_url.is_empty() {
                self.site_origin.as_str()
            } else {
                base_url
            };
            format!("{}{}", origin.trim_end_matches('/'), href)
        } else {
            href.to_string()
        }
    }

    /// Check a link against the URL and title rules.
    ///
    /// Returns the absolute URL and trimmed title of an acceptable link.
    pub fn screen(&self, link: &RawLink) -> Result<(String, String), Rejection> {
        let url = self.absolutize(&link.href, &link.base_url);
        if !self.url_markers.iter().any(|m| url.contains(m.as_str())) {
            return Err(Rejection::NotNews);
        }

        let title = link.title.trim();
        if title.is_empty() {
            return Err(Rejection::EmptyTitle);
        }
        if title.chars().count() < self.min_title_length {
            return Err(Rejection::ShortTitle);
        }
        if self.noise_markers.iter().any(|m| title.contains(m.as_str())) {
            return Err(Rejection::Navigation);
        }

        Ok((url, title.to_string()))
    }

    /// Build one article per distinct URL, in first-seen order.
    #[instrument(level = "info", skip_all, fields(links = links.len()))]
    pub fn normalize(&self, links: &[RawLink]) -> Vec<Article> {
        let articles: Vec<Article> = links
            .iter()
            .filter_map(|link| match self.screen(link) {
                Ok((url, title)) => Some((url, title, link)),
                Err(reason) => {
                    debug!(
                        href = %link.href,
                        title = %truncate_for_log(link.title.trim(), 60),
                        ?reason,
                        "Dropped link"
                    );
                    None
                }
            })
            .unique_by(|(url, _, _)| url.clone())
            .map(|(url, title, link)| {
                let resolved = self.resolver.resolve_with_strategy(&link.date_text, &url);
                match resolved {
                    Some((date, strategy)) => debug!(%url, %date, %strategy, "Resolved date"),
                    None => debug!(%url, raw_date = %link.date_text, "Date unresolved"),
                }
                Article {
                    title,
                    description: String::new(),
                    raw_date: link.date_text.clone(),
                    resolved_date: resolved.map(|(date, _)| date),
                    url,
                }
            })
            .collect();

        info!(count = articles.len(), "Normalized articles");
        articles
    }
}
