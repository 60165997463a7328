//! Byte-budgeted pagination.
//!
//! Content that fits the per-page budget goes out as a single page.
//! Anything larger is split into contiguous chunks and published
//! last-to-first, so every page except the final one can carry a link to
//! the page that follows it in reading order. Credentials rotate by hour
//! of day across the configured pool.

use chrono::Timelike;
use std::time::Duration;
use tracing::{debug, info};

use super::client::TelegraphClient;
use super::node::{Node, NodeAttrs, NodeElement};
use crate::config::Config;
use crate::error::{ProcessError, ProcessResult};

/// Label on the trailing link that stitches pages together.
const NEXT_PAGE_LABEL: &str = "→ Next page";

/// Outcome of one publish call.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Address of the first page in reading order
    pub address: String,
    pub is_multi_page: bool,
    pub page_count: usize,
}

/// Publishes node sequences, paginating when they exceed the byte budget.
#[derive(Debug, Clone)]
pub struct Publisher {
    client: TelegraphClient,
    tokens: Vec<String>,
    page_byte_budget: usize,
    page_delay: Duration,
}

impl Publisher {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            client: TelegraphClient::new(config.api_url.clone()),
            tokens: config.tokens.clone(),
            page_byte_budget: config.page_byte_budget,
            page_delay: config.page_delay,
        }
    }

    /// Publish `nodes` under `title`, returning the first page's address.
    ///
    /// `source_url` is recorded as the page's author link back to the
    /// original article.
    pub async fn publish(
        &self,
        title: &str,
        source_url: &str,
        nodes: Vec<Node>,
    ) -> ProcessResult<PublishOutcome> {
        let token = self.select_token()?;

        let serialized = serde_json::to_string(&nodes)
            .map_err(|e| ProcessError::PublishFailed(format!("content serialization: {e}")))?;
        let total_bytes = serialized.len();

        if total_bytes <= self.page_byte_budget {
            debug!(total_bytes, "content fits a single page");
            let address = self
                .client
                .create_page(token, title, source_url, &nodes)
                .await?;
            return Ok(PublishOutcome {
                address,
                is_multi_page: false,
                page_count: 1,
            });
        }

        self.publish_chunked(token, title, source_url, &nodes, total_bytes)
            .await
    }

    async fn publish_chunked(
        &self,
        token: &str,
        title: &str,
        source_url: &str,
        nodes: &[Node],
        total_bytes: usize,
    ) -> ProcessResult<PublishOutcome> {
        let chunk_size = chunk_size_for(total_bytes, self.page_byte_budget, nodes.len());
        let chunks: Vec<&[Node]> = nodes.chunks(chunk_size).collect();
        let page_count = chunks.len();

        info!(
            total_bytes,
            budget = self.page_byte_budget,
            page_count,
            "content exceeds page budget, splitting"
        );

        // Created back-to-front so each page can link to the one after it
        // without patching anything already published.
        let mut next_address: Option<String> = None;
        for (index, chunk) in chunks.iter().enumerate().rev() {
            let mut page_nodes = chunk.to_vec();
            if let Some(address) = &next_address {
                page_nodes.push(next_page_link(address));
            }

            // Rate limit of the destination service.
            tokio::time::sleep(self.page_delay).await;

            let page_title = if page_count > 1 {
                format!("{title} ({}/{page_count})", index + 1)
            } else {
                title.to_string()
            };
            let address = self
                .client
                .create_page(token, &page_title, source_url, &page_nodes)
                .await?;
            debug!(page = index + 1, total = page_count, %address, "page created");
            next_address = Some(address);
        }

        let address = next_address
            .ok_or_else(|| ProcessError::PublishFailed("no pages were created".to_string()))?;
        Ok(PublishOutcome {
            address,
            is_multi_page: page_count > 1,
            page_count,
        })
    }

    fn select_token(&self) -> ProcessResult<&str> {
        if self.tokens.is_empty() {
            return Err(ProcessError::Config(
                "no publish credentials configured (TELEGRAPH_TOKEN_0..9)".to_string(),
            ));
        }
        let hour = chrono::Local::now().hour() as usize;
        Ok(&self.tokens[hour % self.tokens.len()])
    }
}

/// Chunk length for a sequence that overflows the budget.
///
/// The extra chunk beyond the byte-derived count reserves headroom for
/// per-page titling and the trailing link each non-final page carries.
fn chunk_size_for(total_bytes: usize, budget: usize, node_count: usize) -> usize {
    let chunk_count = total_bytes.div_ceil(budget) + 1;
    node_count.div_ceil(chunk_count).max(1)
}

/// Paragraph holding the link to the next page in reading order.
fn next_page_link(address: &str) -> Node {
    Node::Element(NodeElement {
        tag: "p".to_string(),
        attrs: None,
        children: Some(vec![Node::Element(NodeElement {
            tag: "a".to_string(),
            attrs: Some(NodeAttrs {
                href: Some(address.to_string()),
                src: None,
            }),
            children: Some(vec![Node::text(NEXT_PAGE_LABEL)]),
        })]),
    })
}
