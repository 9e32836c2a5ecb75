//! Kabutan earnings news scraper.
//!
//! This module scrapes the [Kabutan](https://us.kabutan.jp/earnings_news)
//! earnings news listing. The listing has no stable article markup, so a list
//! of increasingly broad selectors is applied and every anchor found is handed
//! on as a [`RawLink`]; [`crate::normalize`] decides which ones are articles.
//!
//! # URL Pattern
//!
//! Articles are linked with site-relative URLs like `/news/n202510010929`,
//! whose digits start with the publication date.

use crate::fetch::PageFetch;
use crate::models::{Article, RawLink, ReportEntry};
use crate::utils::truncate_chars;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Link selectors, most specific first. Extraction order (selector order,
/// then document order) decides which duplicate of a URL is kept.
const LINK_SELECTORS: [&str; 7] = [
    "a[href*='/news/']",
    "a[href*='news']",
    ".news-item",
    ".article-item",
    "tr td a",
    "div a",
    "li a",
];

/// Elements under a link's parent that may carry its date.
const DATE_SELECTOR: &str = "time, .date, .published";

/// Article page containers tried for the excerpt, in order.
const CONTENT_SELECTORS: [&str; 5] = [".article-content", ".news-content", "main", ".content", "article"];

/// Containers with this many characters or fewer are not the article body.
const MIN_CONTENT_CHARS: usize = 50;

/// Excerpts are cut to this many characters.
const MAX_DETAIL_CHARS: usize = 300;

/// The trimmed `<title>` of a document.
pub fn page_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").unwrap();
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

/// First non-empty date text under `parent`.
fn nearby_date(parent: ElementRef<'_>, date_selector: &Selector) -> String {
    parent
        .select(date_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Collect every candidate link on a listing page.
///
/// Links are returned unfiltered and may repeat; each carries `base_url` for
/// resolving site-relative `href`s.
pub fn extract_links(document: &Html, base_url: &str) -> Vec<RawLink> {
    let date_selector = Selector::parse(DATE_SELECTOR).unwrap();
    let mut links = Vec::new();

    for css in LINK_SELECTORS {
        let selector = Selector::parse(css).unwrap();
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let date_text = element
                .parent()
                .and_then(ElementRef::wrap)
                .map(|parent| nearby_date(parent, &date_selector))
                .unwrap_or_default();
            links.push(RawLink::new(
                element.text().collect::<String>(),
                href,
                base_url,
                date_text,
            ));
        }
    }

    debug!(count = links.len(), "Extracted candidate links");
    links
}

/// Fetch the listing page and extract its candidate links.
///
/// # Returns
///
/// The raw links, or an error if the listing fetch fails.
#[instrument(level = "info", skip(fetcher))]
pub async fn index_links<F: PageFetch>(
    fetcher: &F,
    listing_url: &str,
    base_url: &str,
) -> Result<Vec<RawLink>, Box<dyn Error>> {
    let html = fetcher.fetch(listing_url).await?;
    let document = Html::parse_document(&html);

    if let Some(title) = page_title(&document) {
        info!(%title, "Fetched listing page");
    }
    let links = extract_links(&document, base_url);
    info!(count = links.len(), source = listing_url, "Indexed listing links");
    Ok(links)
}

/// Pull a short excerpt out of an article page.
pub fn extract_details(document: &Html) -> Option<String> {
    CONTENT_SELECTORS.iter().find_map(|css| {
        let selector = Selector::parse(css).unwrap();
        let element = document.select(&selector).next()?;
        let text = element.text().collect::<String>();
        let text = text.trim();
        if text.chars().count() > MIN_CONTENT_CHARS {
            Some(truncate_chars(text, MAX_DETAIL_CHARS))
        } else {
            None
        }
    })
}

/// Fetch one article page and extract its excerpt.
///
/// Fetch failures are logged and give `None`.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_details<F: PageFetch>(fetcher: &F, url: &str) -> Option<String> {
    match fetcher.fetch(url).await {
        Ok(body) => {
            let details = extract_details(&Html::parse_document(&body));
            if details.is_none() {
                debug!("No article body found");
            }
            details
        }
        Err(e) => {
            warn!(error = %e, "Article fetch failed; continuing without details");
            None
        }
    }
}

/// Attach details to each article, one page at a time, keeping order.
///
/// With `enabled` false no pages are fetched.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), enabled = enabled))]
pub async fn enrich<F: PageFetch>(fetcher: &F, articles: Vec<Article>, enabled: bool) -> Vec<ReportEntry> {
    let entries: Vec<ReportEntry> = stream::iter(articles)
        .then(|article| async move {
            let details = if enabled {
                fetch_details(fetcher, &article.url).await
            } else {
                None
            };
            ReportEntry { article, details }
        })
        .collect()
        .await;

    info!(
        count = entries.len(),
        with_details = entries.iter().filter(|e| e.details.is_some()).count(),
        "Prepared report entries"
    );
    entries
}
