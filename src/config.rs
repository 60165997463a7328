//! Pipeline configuration
//!
//! Credentials and tunables for extraction and publishing. Everything has a
//! production default; tests override the pieces they need through the
//! `with_*` methods.

use std::env;
use std::time::Duration;

/// Maximum serialized content size Telegraph accepts per page.
pub const PAGE_BYTE_BUDGET: usize = 65_000;

/// Minimum sanitized text length for publishable content.
pub const MIN_CONTENT_CHARS: usize = 50;

/// Delay between successive page-creation calls (Telegraph rate limit).
pub const PAGE_CREATE_DELAY: Duration = Duration::from_secs(3);

/// Deadline for the extraction phase of a pipeline run.
pub const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Budget for a single headless render (navigate, scroll, settle, capture).
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Settle delay after scrolling, letting lazy-loaded content land.
pub const RENDER_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Telegraph page-creation endpoint.
pub const TELEGRAPH_API_URL: &str = "https://api.telegra.ph/createPage";

/// Desktop Chrome user agent presented by both the static fetcher and the
/// headless renderer.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Runtime configuration for the pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Publish credential pool, rotated by hour of day (may be empty;
    /// publishing fails with a configuration error when it is)
    pub tokens: Vec<String>,
    /// Page-creation endpoint (overridable so tests can point at a mock)
    pub api_url: String,
    /// Per-page serialized size budget
    pub page_byte_budget: usize,
    /// Delay between successive page creations
    pub page_delay: Duration,
    /// Extraction phase deadline
    pub extraction_timeout: Duration,
    /// Single render budget
    pub render_timeout: Duration,
    /// Post-scroll settle delay
    pub settle_delay: Duration,
    /// Minimum sanitized text length
    pub min_content_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            api_url: TELEGRAPH_API_URL.to_string(),
            page_byte_budget: PAGE_BYTE_BUDGET,
            page_delay: PAGE_CREATE_DELAY,
            extraction_timeout: EXTRACTION_TIMEOUT,
            render_timeout: RENDER_TIMEOUT,
            settle_delay: RENDER_SETTLE_DELAY,
            min_content_chars: MIN_CONTENT_CHARS,
        }
    }
}

impl Config {
    /// Build a config from the environment.
    ///
    /// Reads `TELEGRAPH_TOKEN_0` through `TELEGRAPH_TOKEN_9` into the
    /// credential pool (gaps are skipped) and honors a `TELEGRAPH_API_URL`
    /// override. An empty pool is not an error here; publishing reports it
    /// when actually attempted.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for i in 0..=9 {
            if let Ok(token) = env::var(format!("TELEGRAPH_TOKEN_{i}")) {
                if !token.is_empty() {
                    config.tokens.push(token);
                }
            }
        }
        if let Ok(url) = env::var("TELEGRAPH_API_URL") {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        config
    }

    /// Replace the credential pool.
    #[must_use]
    pub fn with_tokens(mut self, tokens: Vec<String>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Point page creation at a different endpoint.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the per-page byte budget.
    #[must_use]
    pub fn with_page_byte_budget(mut self, budget: usize) -> Self {
        self.page_byte_budget = budget;
        self
    }

    /// Override the inter-page delay.
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Override the extraction deadline.
    #[must_use]
    pub fn with_extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_tunables() {
        let config = Config::default();
        assert_eq!(config.page_byte_budget, 65_000);
        assert_eq!(config.min_content_chars, 50);
        assert_eq!(config.page_delay, Duration::from_secs(3));
        assert!(config.tokens.is_empty());
    }

    #[test]
    fn overrides_compose() {
        let config = Config::default()
            .with_tokens(vec!["t".into()])
            .with_api_url("http://127.0.0.1:1/createPage")
            .with_page_delay(Duration::ZERO);
        assert_eq!(config.tokens.len(), 1);
        assert_eq!(config.api_url, "http://127.0.0.1:1/createPage");
        assert_eq!(config.page_delay, Duration::ZERO);
    }
}
