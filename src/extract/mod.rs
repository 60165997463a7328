//! Tiered content extraction.
//!
//! Extraction strategies are tried in a fixed escalation order: static
//! readability first, the same algorithm over rendered HTML second, and a
//! DOM-heuristic pass last. Each tier either produces a candidate or
//! signals it is unusable; the orchestrator stops at the first candidate
//! that passes the quality gate and applies one final sanitize-and-check
//! before handing the result to publishing.

mod heuristic;
mod readability;
mod signals;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::{ProcessError, ProcessResult};
use crate::renderer::Renderer;
use crate::sanitize::sanitize;
use signals::{is_blocked, is_too_short};

pub use heuristic::DomHeuristicTier;
pub use readability::{RenderedReadabilityTier, StaticReadabilityTier};

/// Title used when a page offers none of its own.
const UNTITLED_PLACEHOLDER: &str = "Untitled";

/// One extraction attempt's output: raw article markup plus metadata.
///
/// `content` stays unsanitized until the final acceptance gate runs.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub title: String,
    pub content: String,
    pub source_url: String,
}

/// Per-run state shared across tiers.
///
/// Rendering is expensive, so the first tier that needs rendered HTML pays
/// for it and later tiers reuse the cached copy.
pub struct TierContext<'a> {
    renderer: &'a Renderer,
    rendered_html: Option<String>,
}

impl<'a> TierContext<'a> {
    pub(crate) fn new(renderer: &'a Renderer) -> Self {
        Self {
            renderer,
            rendered_html: None,
        }
    }

    /// Rendered HTML for `url`, fetched on first use.
    ///
    /// Renderer failures propagate; a tier that cannot get rendered HTML is
    /// a pipeline-level problem, not a quiet escalation.
    pub async fn rendered(&mut self, url: &str) -> ProcessResult<&str> {
        if self.rendered_html.is_none() {
            debug!(%url, "rendering page for escalated extraction");
            self.rendered_html = Some(self.renderer.render(url).await?);
        }
        self.rendered_html
            .as_deref()
            .ok_or_else(|| ProcessError::RenderFailed("render cache empty".to_string()))
    }
}

/// One extraction strategy in the escalation chain.
#[async_trait]
pub trait ExtractionTier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to extract an article.
    ///
    /// `Ok(None)` means this tier cannot handle the page and the next tier
    /// should run. `Err` is reserved for failures that abort the whole run,
    /// such as the renderer dying.
    async fn attempt(&self, url: &str, ctx: &mut TierContext<'_>)
    -> ProcessResult<Option<Extraction>>;
}

/// Runs the escalation chain and the final acceptance gate.
pub struct TieredExtractor {
    renderer: Renderer,
    min_content_chars: usize,
    tiers: Vec<Box<dyn ExtractionTier>>,
}

impl TieredExtractor {
    /// Extractor with the production tier chain.
    #[must_use]
    pub fn new(config: &Config, renderer: Renderer) -> Self {
        Self::with_tiers(
            config,
            renderer,
            vec![
                Box::new(StaticReadabilityTier::new()),
                Box::new(RenderedReadabilityTier),
                Box::new(DomHeuristicTier),
            ],
        )
    }

    /// Extractor with a custom tier chain.
    #[must_use]
    pub fn with_tiers(
        config: &Config,
        renderer: Renderer,
        tiers: Vec<Box<dyn ExtractionTier>>,
    ) -> Self {
        Self {
            renderer,
            min_content_chars: config.min_content_chars,
            tiers,
        }
    }

    /// Extract an article from `url`, escalating until a tier's output
    /// passes the quality gate.
    ///
    /// Each attempted tier replaces the candidate outright, so the final
    /// gate always judges the best effort of the deepest tier reached.
    pub async fn extract(&self, url: &str) -> ProcessResult<Extraction> {
        let mut ctx = TierContext::new(&self.renderer);
        let mut candidate: Option<Extraction> = None;

        for tier in &self.tiers {
            let attempt = tier.attempt(url, &mut ctx).await?;
            let accepted = attempt.as_ref().is_some_and(|e| self.acceptable(e));
            candidate = attempt;
            if accepted {
                debug!(tier = tier.name(), "extraction accepted");
                break;
            }
            debug!(tier = tier.name(), "extraction unusable, escalating");
        }

        let extraction = candidate.ok_or(ProcessError::ExtractionFailed)?;
        self.finalize(extraction)
    }

    fn acceptable(&self, extraction: &Extraction) -> bool {
        !is_blocked(&extraction.content)
            && !is_too_short(&extraction.content, self.min_content_chars)
    }

    /// Sanitize and apply the acceptance gate one last time.
    fn finalize(&self, mut extraction: Extraction) -> ProcessResult<Extraction> {
        extraction.content = sanitize(&extraction.content);

        let title = extraction.title.trim();
        extraction.title = if title.is_empty() {
            UNTITLED_PLACEHOLDER.to_string()
        } else {
            title.to_string()
        };

        if is_blocked(&extraction.content) {
            return Err(ProcessError::ContentUnavailable);
        }
        if is_too_short(&extraction.content, self.min_content_chars) {
            return Err(ProcessError::TooShort);
        }

        Ok(extraction)
    }
}
