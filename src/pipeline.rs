//! End-to-end URL processing.
//!
//! Normalizes and screens the URL, extracts the article through the tier
//! chain under a wall-clock deadline, converts it to publishable nodes,
//! and hands those to the paginating publisher.

use tracing::info;

use crate::config::Config;
use crate::error::{ProcessError, ProcessResult};
use crate::extract::TieredExtractor;
use crate::links::{is_valid_url, normalize_url, should_skip_url};
use crate::renderer::Renderer;
use crate::telegraph::{Publisher, html_to_nodes};

/// Result of one processed URL.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Address of the published page (first page when paginated).
    pub address: String,
    pub title: String,
    pub is_multi_page: bool,
    pub page_count: usize,
}

/// The extraction-and-publishing pipeline.
///
/// One instance serves any number of URLs; concurrent calls share the
/// renderer handle and the publish credential pool.
pub struct Pipeline {
    config: Config,
    renderer: Renderer,
    extractor: TieredExtractor,
    publisher: Publisher,
}

impl Pipeline {
    /// Pipeline with the production tier chain and a fresh renderer handle.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let renderer = Renderer::new(&config);
        let extractor = TieredExtractor::new(&config, renderer.clone());
        Self::with_extractor(config, renderer, extractor)
    }

    /// Pipeline over a caller-supplied extractor, used to swap tier chains.
    #[must_use]
    pub fn with_extractor(config: Config, renderer: Renderer, extractor: TieredExtractor) -> Self {
        let publisher = Publisher::new(&config);
        Self {
            config,
            renderer,
            extractor,
            publisher,
        }
    }

    /// Convert `raw_url` into a published page.
    ///
    /// Extraction runs under the configured deadline; publishing does not,
    /// since multi-page uploads legitimately take several seconds per page.
    pub async fn process_url(&self, raw_url: &str) -> ProcessResult<ProcessOutcome> {
        let url = normalize_url(raw_url);
        if !is_valid_url(&url) {
            return Err(ProcessError::InvalidUrl(url));
        }
        if should_skip_url(&url) {
            return Err(ProcessError::SkippedUrl(url));
        }

        info!(%url, "processing article");
        let deadline = self.config.extraction_timeout;
        let extraction = match tokio::time::timeout(deadline, self.extractor.extract(&url)).await {
            Ok(result) => result?,
            Err(_) => return Err(ProcessError::Timeout(deadline.as_secs())),
        };

        let nodes = html_to_nodes(&extraction.content);
        let published = self
            .publisher
            .publish(&extraction.title, &extraction.source_url, nodes)
            .await?;

        info!(address = %published.address, pages = published.page_count, "published");
        Ok(ProcessOutcome {
            address: published.address,
            title: extraction.title,
            is_multi_page: published.is_multi_page,
            page_count: published.page_count,
        })
    }

    /// Release the shared renderer, if one was ever launched.
    pub async fn shutdown(&self) {
        self.renderer.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_unparseable_url() {
        let pipeline = Pipeline::new(Config::default());
        let err = pipeline.process_url("not a url").await.unwrap_err();
        assert!(matches!(err, ProcessError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn skips_video_platforms() {
        let pipeline = Pipeline::new(Config::default());
        let err = pipeline
            .process_url("https://youtube.com/watch?v=abc")
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::SkippedUrl(_)));
    }

    #[tokio::test]
    async fn skips_already_published_pages() {
        let pipeline = Pipeline::new(Config::default());
        let err = pipeline
            .process_url("https://telegra.ph/Some-Page-01-01")
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::SkippedUrl(_)));
    }
}
