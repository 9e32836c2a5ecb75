//! The selection pipeline: normalize, then filter by recency and keywords.
//!
//! Everything here is synchronous and takes the reference instant as an
//! argument, so a run over fixed links always selects the same articles.

use crate::config::Settings;
use crate::dates::DateResolver;
use crate::filters::{filter_by_keywords, filter_recent};
use crate::models::{Article, RawLink};
use crate::normalize::ArticleNormalizer;
use chrono::{DateTime, Local};
use tracing::{debug, info, instrument};

/// Build the normalizer described by `settings`, resolving years against `now`.
pub fn normalizer_from_settings(
    settings: &Settings,
    now: DateTime<Local>,
) -> Result<ArticleNormalizer, url::ParseError> {
    let origin = settings.resolved_site_origin()?;
    let resolver = DateResolver::from_reference(now);
    debug!(
        site_origin = %origin,
        current_year = resolver.current_year(),
        min_title_length = settings.min_title_length,
        "Built article normalizer"
    );
    Ok(ArticleNormalizer::new(origin, resolver)
        .with_url_markers(settings.url_markers.clone())
        .with_noise_markers(settings.navigation_noise_markers.clone())
        .with_min_title_length(settings.min_title_length))
}

/// Turn raw links into the articles worth reporting.
#[instrument(level = "info", skip_all, fields(links = links.len(), days_back = days_back, now = %now))]
pub fn select_articles(
    links: &[RawLink],
    normalizer: &ArticleNormalizer,
    days_back: u64,
    keywords: &[String],
    now: DateTime<Local>,
) -> Vec<Article> {
    let articles = normalizer.normalize(links);
    let total = articles.len();
    let recent = filter_recent(articles, days_back, now);
    let recent_count = recent.len();
    let selected = filter_by_keywords(recent, keywords);

    info!(
        total,
        recent = recent_count,
        selected = selected.len(),
        "Selected articles"
    );
    selected
}
