//! DOM-heuristic fallback extraction.
//!
//! Last-resort tier for pages neither readability pass can handle. Walks a
//! priority list of containers likely to hold the article, strips obvious
//! page chrome, and re-serializes whatever structure remains. Less precise
//! about article boundaries than readability, which is why it runs last.

use async_trait::async_trait;
use ego_tree::NodeId;
use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::{Extraction, ExtractionTier, TierContext};
use crate::error::ProcessResult;

/// Upper bound on rendered documents fed to this pass (10 MB).
const MAX_HTML_SIZE: usize = 10 * 1024 * 1024;

/// Recursion cap for the subtree serializer. Real articles sit far below
/// this; anything deeper is truncated with a warning.
const MAX_NESTING_DEPTH: usize = 100;

/// Containers checked in priority order for the article body.
static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "article",
        "main",
        "[role='main']",
        "[itemprop='articleBody']",
        ".post-content",
        ".entry-content",
        ".article-content",
        "#content",
        ".content",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("BUG: hardcoded CSS selector is invalid"))
    .collect()
});

/// Page chrome removed from the chosen container before serialization.
static NOISE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "script",
        "style",
        "noscript",
        "nav",
        "header",
        "footer",
        "aside",
        "form",
        ".sidebar",
        ".comments",
        ".related-posts",
        ".social-share",
        ".ads",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("BUG: hardcoded CSS selector is invalid"))
    .collect()
});

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("BUG: hardcoded CSS selector is invalid"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("BUG: hardcoded CSS selector is invalid"));

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Pull the most article-like subtree out of `html`.
///
/// Returns `None` when the document is oversized or the chosen container
/// serializes to nothing, signalling the tier is unusable.
pub(crate) fn extract_heuristic(html: &str, url: &str) -> Option<Extraction> {
    if html.len() > MAX_HTML_SIZE {
        debug!(bytes = html.len(), "document too large for heuristic pass");
        return None;
    }

    let document = Html::parse_document(html);
    let root = CONTENT_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .or_else(|| document.select(&BODY_SELECTOR).next())?;

    let noise: HashSet<NodeId> = NOISE_SELECTORS
        .iter()
        .flat_map(|selector| root.select(selector).map(|el| el.id()))
        .collect();

    let mut content = String::new();
    serialize_children(root, &noise, &mut content, 0);
    if content.trim().is_empty() {
        return None;
    }

    Some(Extraction {
        title: document_title(&document),
        content,
        source_url: url.to_string(),
    })
}

fn document_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Serialize an element's children, skipping noise subtrees.
///
/// Attributes are kept as-is; the sanitizer downstream decides what
/// survives. Comments and other non-content nodes are dropped here.
fn serialize_children(
    element: ElementRef,
    skip: &HashSet<NodeId>,
    output: &mut String,
    depth: usize,
) {
    if depth > MAX_NESTING_DEPTH {
        warn!(depth, "nesting depth limit hit, truncating heuristic output");
        return;
    }

    for child in element.children() {
        match child.value() {
            scraper::node::Node::Text(text) => {
                output.push_str(&encode_text(&**text));
            }
            scraper::node::Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if skip.contains(&child_el.id()) {
                    continue;
                }

                let name = child_el.value().name();
                output.push('<');
                output.push_str(name);
                for (attr, value) in child_el.value().attrs() {
                    output.push(' ');
                    output.push_str(attr);
                    output.push_str("=\"");
                    output.push_str(&encode_double_quoted_attribute(value));
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    continue;
                }
                serialize_children(child_el, skip, output, depth + 1);
                output.push_str("</");
                output.push_str(name);
                output.push('>');
            }
            _ => {}
        }
    }
}

/// Tier wrapper over [`extract_heuristic`], fed by the shared rendered HTML.
pub struct DomHeuristicTier;

#[async_trait]
impl ExtractionTier for DomHeuristicTier {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn attempt(
        &self,
        url: &str,
        ctx: &mut TierContext<'_>,
    ) -> ProcessResult<Option<Extraction>> {
        let html = ctx.rendered(url).await?;
        Ok(extract_heuristic(html, url))
    }
}
