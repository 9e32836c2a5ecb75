//! Console report for selected articles.

use crate::filters::recency_cutoff;
use crate::models::{Report, ReportEntry};
use crate::utils::clean_title;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Display format for resolved dates.
const DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Assemble the report for a run started at `now`.
pub fn build_report(
    entries: Vec<ReportEntry>,
    now: DateTime<Local>,
    days_back: u64,
    keywords: &[String],
) -> Report {
    Report {
        local_date: now.date_naive().to_string(),
        local_time: now.format("%H:%M:%S").to_string(),
        cutoff: recency_cutoff(now, days_back),
        days_back,
        keywords: keywords.to_vec(),
        articles: entries,
    }
}

/// The date line of one entry, if there is anything to show.
fn date_line(entry: &ReportEntry) -> Option<String> {
    let article = &entry.article;
    match article.resolved_date {
        Some(date) if article.raw_date.is_empty() => Some(date.format(DATE_FORMAT).to_string()),
        Some(date) => Some(format!(
            "{} (元の表記: {})",
            date.format(DATE_FORMAT),
            article.raw_date
        )),
        None if !article.raw_date.is_empty() => Some(article.raw_date.clone()),
        None => None,
    }
}

/// Render the report as plain text.
pub fn render(report: &Report) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "日付フィルター: {}以降の記事 (過去{}日間)",
        report.cutoff.format("%Y/%m/%d"),
        report.days_back
    )
    .unwrap();
    writeln!(
        out,
        "「{}」関連の決算ニュース記事: {}件",
        report.keywords.join("・"),
        report.articles.len()
    )
    .unwrap();
    writeln!(out, "{}", "=".repeat(80)).unwrap();

    if report.articles.is_empty() {
        writeln!(out, "該当する記事が見つかりませんでした。").unwrap();
        return out;
    }

    for (i, entry) in report.articles.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, clean_title(&entry.article.title)).unwrap();
        writeln!(out, "   URL: {}", entry.article.url).unwrap();
        if let Some(line) = date_line(entry) {
            writeln!(out, "   日付: {}", line).unwrap();
        }
        if let Some(details) = &entry.details {
            writeln!(out, "   詳細: {}", details).unwrap();
        }
        writeln!(out).unwrap();
    }

    out
}
