//! Recency and keyword filters over normalized articles.
//!
//! Both filters keep input order and never drop an article for lack of data:
//! an article with no resolved date passes the recency check.

use crate::models::Article;
use chrono::{DateTime, Days, Local};
use tracing::{info, instrument};

/// Windows wider than this (about a thousand years) are clamped.
const MAX_DAYS_BACK: u64 = 365_000;

/// The oldest publication time that still counts as recent.
///
/// Subtracts whole calendar days, so the cutoff keeps the wall-clock time of
/// `now` across DST changes.
pub fn recency_cutoff(now: DateTime<Local>, days_back: u64) -> DateTime<Local> {
    now.checked_sub_days(Days::new(days_back.min(MAX_DAYS_BACK)))
        .unwrap_or(now)
}

/// Keep articles published at or after `now - days_back` days.
///
/// Articles whose date could not be resolved are kept.
#[instrument(level = "info", skip(articles), fields(articles = articles.len()))]
pub fn filter_recent(articles: Vec<Article>, days_back: u64, now: DateTime<Local>) -> Vec<Article> {
    let cutoff = recency_cutoff(now, days_back);
    let recent: Vec<Article> = articles
        .into_iter()
        .filter(|article| match article.resolved_date {
            Some(date) => date >= cutoff,
            None => true,
        })
        .collect();

    info!(%cutoff, kept = recent.len(), "Applied recency filter");
    recent
}

/// True when any keyword occurs in `text`, verbatim or ignoring case.
fn mentions(text: &str, text_lower: &str, keyword: &str) -> bool {
    text.contains(keyword) || text_lower.contains(&keyword.to_lowercase())
}

/// Keep articles whose title or description contains any of `keywords`.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), keywords = keywords.len()))]
pub fn filter_by_keywords(articles: Vec<Article>, keywords: &[String]) -> Vec<Article> {
    let matched: Vec<Article> = articles
        .into_iter()
        .filter(|article| {
            let title_lower = article.title.to_lowercase();
            let description_lower = article.description.to_lowercase();
            keywords.iter().any(|keyword| {
                mentions(&article.title, &title_lower, keyword)
                    || mentions(&article.description, &description_lower, keyword)
            })
        })
        .collect();

    info!(kept = matched.len(), "Applied keyword filter");
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(title: &str, description: &str, date: Option<DateTime<Local>>) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://site/news/{}", title.len()),
            description: description.to_string(),
            raw_date: String::new(),
            resolved_date: date,
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_recency_cutoff() {
        assert_eq!(recency_cutoff(local(2025, 10, 5, 0, 0), 2), local(2025, 10, 3, 0, 0));
        assert_eq!(recency_cutoff(local(2025, 3, 1, 8, 15), 1), local(2025, 2, 28, 8, 15));
    }

    #[test]
    fn test_filter_recent_boundary() {
        let articles = vec![
            article("at cutoff", "", Some(local(2025, 10, 3, 0, 0))),
            article("just before", "", Some(local(2025, 10, 2, 23, 59))),
            article("unknown", "", None),
            article("today", "", Some(local(2025, 10, 4, 12, 0))),
        ];
        let kept: Vec<String> = filter_recent(articles, 2, local(2025, 10, 5, 0, 0))
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(kept, vec!["at cutoff", "unknown", "today"]);
    }

    #[test]
    fn test_filter_recent_zero_days() {
        let now = local(2025, 10, 5, 9, 0);
        let articles = vec![
            article("same instant", "", Some(now)),
            article("earlier today", "", Some(local(2025, 10, 5, 8, 59))),
        ];
        let kept = filter_recent(articles, 0, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "same instant");
    }

    #[test]
    fn test_filter_by_keywords_japanese() {
        let keywords = vec!["増収増益".to_string()];
        let articles = vec![
            article("トヨタ、増収増益で過去最高益", "", None),
            article("ソニー、減収減益に転落", "", None),
        ];
        let kept = filter_by_keywords(articles, &keywords);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "トヨタ、増収増益で過去最高益");
    }

    #[test]
    fn test_filter_by_keywords_matches_description() {
        let keywords = vec!["上方修正".to_string()];
        let articles = vec![article("決算短信のお知らせです", "通期予想を上方修正", None)];
        assert_eq!(filter_by_keywords(articles, &keywords).len(), 1);
    }

    #[test]
    fn test_filter_by_keywords_ignores_case() {
        let keywords = vec!["EPS Beat".to_string()];
        let articles = vec![
            article("Acme eps beat estimates", "", None),
            article("Acme misses", "", None),
        ];
        let kept = filter_by_keywords(articles, &keywords);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Acme eps beat estimates");
    }

    #[test]
    fn test_filter_by_keywords_no_duplicates_and_order() {
        let keywords = vec!["増収".to_string(), "増益".to_string(), "好調".to_string()];
        let articles = vec![
            article("B社、増収増益で好調", "", None),
            article("A社、好調な受注", "", None),
        ];
        let kept: Vec<String> = filter_by_keywords(articles, &keywords)
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(kept, vec!["B社、増収増益で好調", "A社、好調な受注"]);
    }

    #[test]
    fn test_filter_by_keywords_empty_keywords_drop_everything() {
        let articles = vec![article("何かのニュース記事です", "", None)];
        assert!(filter_by_keywords(articles, &[]).is_empty());
    }
}
