//! Command-line interface definitions for Earnings Growth News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option is optional: anything left out falls back to the settings
//! file given with `--config`, and then to the built-in defaults.

use crate::config::Settings;
use clap::Parser;

/// Command-line arguments for the Earnings Growth News application.
///
/// # Examples
///
/// ```sh
/// # Last two days of growth headlines from the default listing
/// earnings_growth_news
///
/// # Wider window, custom keywords, JSON copy of the report
/// earnings_growth_news -d 7 -k 増収増益 -k 上方修正 -j ./json
///
/// # Settings file plus a one-off override
/// earnings_growth_news --config ./news.yaml --no-details
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "EARNINGS_NEWS_CONFIG")]
    pub config: Option<String>,

    /// Listing page to scrape
    #[arg(short, long, env = "EARNINGS_NEWS_URL")]
    pub url: Option<String>,

    /// Origin prepended to site-relative links (defaults to the listing URL's origin)
    #[arg(long)]
    pub site_origin: Option<String>,

    /// Keep articles from the last N days
    #[arg(short, long)]
    pub days_back: Option<u64>,

    /// Keyword an article must mention (repeatable; replaces the default set)
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Minimum title length in characters
    #[arg(long)]
    pub min_title_length: Option<usize>,

    /// Skip fetching article pages for excerpts
    #[arg(long)]
    pub no_details: bool,

    /// Retries per page after a failed request
    #[arg(long)]
    pub max_retries: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given onto `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(url) = &self.url {
            settings.listing_url = url.clone();
        }
        if let Some(origin) = &self.site_origin {
            settings.site_origin = Some(origin.clone());
        }
        if let Some(days) = self.days_back {
            settings.days_back = days;
        }
        if !self.keywords.is_empty() {
            settings.keywords = self.keywords.clone();
        }
        if let Some(len) = self.min_title_length {
            settings.min_title_length = len;
        }
        if self.no_details {
            settings.fetch_details = false;
        }
        if let Some(retries) = self.max_retries {
            settings.max_retries = retries;
        }
        if let Some(secs) = self.timeout_secs {
            settings.timeout_secs = secs;
        }
        if let Some(dir) = &self.json_output_dir {
            settings.json_output_dir = Some(dir.clone());
        }
        settings
    }
}
