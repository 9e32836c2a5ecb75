//! Run settings: built-in defaults, an optional YAML file, and CLI overrides.
//!
//! Precedence is CLI flag, then YAML file, then the defaults below. A YAML
//! file only needs the keys it changes:
//!
//! ```yaml
//! days_back: 3
//! keywords:
//!   - 増収増益
//!   - 上方修正
//! fetch_details: false
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_LISTING_URL: &str = "https://us.kabutan.jp/earnings_news";
pub const DEFAULT_DAYS_BACK: u64 = 2;
pub const DEFAULT_MIN_TITLE_LENGTH: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Revenue and profit growth terms.
pub fn default_keywords() -> Vec<String> {
    ["増収増益", "増収営業増益", "好調", "上方修正", "増加"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Link text markers for login and sign-up navigation.
pub fn default_noise_markers() -> Vec<String> {
    vec!["ログイン".to_string(), "登録".to_string()]
}

/// URL substrings that mark a link as news.
pub fn default_url_markers() -> Vec<String> {
    vec!["news".to_string(), "earnings".to_string()]
}

/// All knobs for one run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Listing page to scrape.
    pub listing_url: String,
    /// Origin prepended to site-relative links; derived from `listing_url` when unset.
    pub site_origin: Option<String>,
    /// Recency window in days.
    pub days_back: u64,
    pub keywords: Vec<String>,
    pub navigation_noise_markers: Vec<String>,
    pub url_markers: Vec<String>,
    /// Minimum title length in characters.
    pub min_title_length: usize,
    /// Fetch each selected article page for a short excerpt.
    pub fetch_details: bool,
    /// Retries per page after the first failed attempt.
    pub max_retries: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Write the report as JSON under this directory.
    pub json_output_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            site_origin: None,
            days_back: DEFAULT_DAYS_BACK,
            keywords: default_keywords(),
            navigation_noise_markers: default_noise_markers(),
            url_markers: default_url_markers(),
            min_title_length: DEFAULT_MIN_TITLE_LENGTH,
            fetch_details: true,
            max_retries: 2,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            json_output_dir: None,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. Missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not a mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Load settings from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_yaml(&text)?;
        info!("Loaded settings file");
        Ok(settings)
    }

    /// The origin used for site-relative links.
    ///
    /// Uses `site_origin` when set, otherwise the scheme, host and port of
    /// `listing_url`.
    pub fn resolved_site_origin(&self) -> Result<String, url::ParseError> {
        if let Some(origin) = &self.site_origin {
            return Ok(origin.trim_end_matches('/').to_string());
        }
        let listing = Url::parse(&self.listing_url)?;
        Ok(listing.origin().ascii_serialization())
    }
}
