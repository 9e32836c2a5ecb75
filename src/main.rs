//! # Earnings Growth News
//!
//! Scans an earnings news listing (Kabutan by default) for recent articles
//! that report revenue and profit growth, and prints them as a short report.
//!
//! ## Usage
//!
//! ```sh
//! earnings_growth_news -d 2 -k 増収増益
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Indexing**: Fetch the listing page and collect every candidate link
//! 2. **Normalizing**: One article per URL, with a publication date inferred
//!    from nearby text or from the article id in the URL
//! 3. **Filtering**: Keep recent articles (unknown dates pass) that mention a
//!    growth keyword
//! 4. **Output**: Optionally fetch an excerpt per article, then print the
//!    report and write a JSON copy

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod fetch;
mod filters;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::Settings;
use fetch::{HttpFetcher, RetryFetch};
use outputs::{json, report};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("earnings_growth_news starting up");

    // --- Settings: defaults < YAML file < CLI flags ---
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let file_settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let settings = args.apply(file_settings);
    let site_origin = settings.resolved_site_origin()?;
    info!(
        listing_url = %settings.listing_url,
        %site_origin,
        days_back = settings.days_back,
        keywords = ?settings.keywords,
        "Resolved settings"
    );

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &settings.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let fetcher = RetryFetch::new(
        HttpFetcher::new(&settings.user_agent, StdDuration::from_secs(settings.timeout_secs))?,
        settings.max_retries,
        StdDuration::from_secs(1),
    );

    // ---- Index listing ----
    let links = match scrapers::kabutan::index_links(&fetcher, &settings.listing_url, &site_origin).await {
        Ok(links) => links,
        Err(e) => {
            error!(url = %settings.listing_url, error = %e, "Failed to fetch listing page");
            return Err(e);
        }
    };

    // ---- Normalize and filter ----
    let now = Local::now();
    let normalizer = pipeline::normalizer_from_settings(&settings, now)?;
    let selected = pipeline::select_articles(
        &links,
        &normalizer,
        settings.days_back,
        &settings.keywords,
        now,
    );

    // ---- Details and report ----
    let entries = scrapers::kabutan::enrich(&fetcher, selected, settings.fetch_details).await;
    let front = report::build_report(entries, now, settings.days_back, &settings.keywords);
    print!("{}", report::render(&front));

    if let Some(dir) = &settings.json_output_dir {
        if let Err(e) = json::write_report(&front, dir).await {
            error!(error = %e, "Failed to write JSON report");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = front.articles.len(),
        "Execution complete"
    );

    Ok(())
}
