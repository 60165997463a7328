//! Readability-based extraction, with and without rendering.
//!
//! Both the static tier and the rendered tier run the same structured
//! extraction algorithm; they differ only in where the markup comes from.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::debug;

use super::{Extraction, ExtractionTier, TierContext};
use crate::config::CHROME_USER_AGENT;
use crate::error::ProcessResult;

/// Deadline for the unrendered fetch. Kept well under the pipeline budget
/// so the rendered tiers still have room to run.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Guards against pathological documents; articles stay well under this.
const MAX_PARSE_ELEMENTS: usize = 30_000;

/// Run structured content extraction over `html`.
///
/// Returns `None` when the document has no recognizable article body, so
/// callers can treat it as an escalation signal rather than an error.
pub(crate) fn extract_readable(html: &str, url: &str) -> Option<Extraction> {
    let cfg = dom_smoothie::Config {
        max_elements_to_parse: MAX_PARSE_ELEMENTS,
        ..Default::default()
    };

    let mut readability = dom_smoothie::Readability::new(html, Some(url), Some(cfg)).ok()?;
    let article = readability.parse().ok()?;

    let content = article.content.to_string();
    if content.trim().is_empty() {
        return None;
    }

    Some(Extraction {
        title: article.title,
        content,
        source_url: url.to_string(),
    })
}

/// Tier that reads the article out of the server-sent markup, without
/// executing any page scripts.
pub struct StaticReadabilityTier {
    http: Client,
}

impl StaticReadabilityTier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for StaticReadabilityTier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionTier for StaticReadabilityTier {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn attempt(
        &self,
        url: &str,
        _ctx: &mut TierContext<'_>,
    ) -> ProcessResult<Option<Extraction>> {
        let response = match self
            .http
            .get(url)
            .header(USER_AGENT, CHROME_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("static fetch failed: {e}");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "static fetch rejected");
            return Ok(None);
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                debug!("static fetch body unreadable: {e}");
                return Ok(None);
            }
        };

        Ok(extract_readable(&html, url))
    }
}

/// Tier that re-runs the same extraction against fully rendered HTML.
pub struct RenderedReadabilityTier;

#[async_trait]
impl ExtractionTier for RenderedReadabilityTier {
    fn name(&self) -> &'static str {
        "rendered"
    }

    async fn attempt(
        &self,
        url: &str,
        ctx: &mut TierContext<'_>,
    ) -> ProcessResult<Option<Extraction>> {
        let html = ctx.rendered(url).await?;
        Ok(extract_readable(html, url))
    }
}
