//! Page fetching with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`PageFetch`]: Core trait for "given a URL, return the page body"
//! - [`HttpFetcher`]: `reqwest` client with a timeout and desktop User-Agent
//! - [`RetryFetch`]: Decorator that adds retry logic to any `PageFetch`
//!
//! # Retry Strategy
//!
//! - Configurable number of retries after the first attempt
//! - Exponential backoff starting at the base delay
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use rand::{Rng, rng};
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Trait for fetching a page body.
pub trait PageFetch {
    /// Fetch `url` and return its body as text.
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Plain HTTP GET via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the given User-Agent and per-request timeout.
    pub fn new(user_agent: &str, timeout: StdDuration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(format!("HTTP error: {}", status.as_u16()).into());
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`PageFetch`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: PageFetch,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = attempt.saturating_sub(1).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> PageFetch for RetryFetch<T>
where
    T: PageFetch,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// In-memory pages; unknown URLs fail.
    #[derive(Debug, Default)]
    pub(crate) struct StaticPages {
        pub pages: HashMap<String, String>,
    }

    impl StaticPages {
        pub fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl PageFetch for StaticPages {
        async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| format!("HTTP error: 404 for {url}").into())
        }
    }

    /// Fails a fixed number of times before succeeding.
    #[derive(Debug)]
    struct Flaky {
        failures: usize,
        calls: Cell<usize>,
    }

    impl PageFetch for Flaky {
        async fn fetch(&self, _url: &str) -> Result<String, Box<dyn Error>> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n <= self.failures {
                Err("connection reset".into())
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let retry = RetryFetch::new(StaticPages::default(), 10, StdDuration::from_secs(1));
        assert_eq!(retry.backoff(1), StdDuration::from_secs(1));
        assert_eq!(retry.backoff(2), StdDuration::from_secs(2));
        assert_eq!(retry.backoff(4), StdDuration::from_secs(8));
        assert_eq!(retry.backoff(6), StdDuration::from_secs(30));
        assert_eq!(retry.backoff(60), StdDuration::from_secs(30));
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let retry = RetryFetch::new(
            Flaky { failures: 2, calls: Cell::new(0) },
            2,
            StdDuration::from_millis(1),
        );
        let body = retry.fetch("https://site/earnings_news").await.unwrap();
        assert_eq!(body, "<html></html>");
        assert_eq!(retry.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let retry = RetryFetch::new(
            Flaky { failures: 5, calls: Cell::new(0) },
            1,
            StdDuration::from_millis(1),
        );
        assert!(retry.fetch("https://site/earnings_news").await.is_err());
        assert_eq!(retry.inner.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_static_pages() {
        let pages = StaticPages::default().with("https://site/a", "body");
        assert_eq!(pages.fetch("https://site/a").await.unwrap(), "body");
        assert!(pages.fetch("https://site/b").await.is_err());
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new("test-agent", StdDuration::from_secs(5)).is_ok());
    }
}
