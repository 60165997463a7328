pub mod config;
pub mod error;
pub mod extract;
pub mod links;
pub mod pending;
pub mod pipeline;
pub mod renderer;
pub mod sanitize;
pub mod telegraph;

pub use config::Config;
pub use error::{ProcessError, ProcessResult};
pub use extract::{
    DomHeuristicTier, Extraction, ExtractionTier, RenderedReadabilityTier, StaticReadabilityTier,
    TierContext, TieredExtractor,
};
pub use links::{extract_urls, is_valid_url, normalize_url, should_skip_url};
pub use pending::{NextItem, PendingQueues, make_id};
pub use pipeline::{Pipeline, ProcessOutcome};
pub use renderer::Renderer;
pub use sanitize::sanitize;
pub use telegraph::{Node, NodeAttrs, NodeElement, PublishOutcome, Publisher, html_to_nodes};
