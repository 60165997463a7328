//! Sanitized HTML to content-node conversion.
//!
//! Pure, deterministic mapping from a parsed document to the wire node
//! tree: text nodes become text leaves, elements keep their tag plus any
//! `href`/`src`, and every other node kind (comments, doctypes) is dropped.
//! The returned sequence is the body's children, never the body itself.

use std::sync::LazyLock;

use scraper::node::Node as DomNode;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::node::{Node, NodeAttrs, NodeElement};

/// Nesting depth cutoff; deeper content is truncated rather than risking
/// the stack on pathological markup.
const MAX_NESTING_DEPTH: usize = 100;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid"));

/// Convert sanitized HTML into the publishable node sequence.
#[must_use]
pub fn html_to_nodes(html: &str) -> Vec<Node> {
    let document = Html::parse_document(html);
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return Vec::new();
    };
    convert_children(&body, 0)
}

fn convert_children(element: &ElementRef, depth: usize) -> Vec<Node> {
    if depth > MAX_NESTING_DEPTH {
        warn!(
            depth,
            limit = MAX_NESTING_DEPTH,
            "content nesting exceeds depth limit, truncating subtree"
        );
        return Vec::new();
    }

    let mut out = Vec::new();
    for child in element.children() {
        match child.value() {
            DomNode::Text(text) => out.push(Node::Text(text.to_string())),
            DomNode::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    out.push(convert_element(&child_el, depth));
                }
            }
            // Comments and other non-content nodes are omitted.
            _ => {}
        }
    }
    out
}

fn convert_element(el: &ElementRef, depth: usize) -> Node {
    let value = el.value();

    let attrs = NodeAttrs {
        href: value.attr("href").map(str::to_string),
        src: value.attr("src").map(str::to_string),
    };
    let attrs = if attrs.is_empty() { None } else { Some(attrs) };

    let children = if el.has_children() {
        Some(convert_children(el, depth + 1))
    } else {
        None
    };

    Node::Element(NodeElement {
        tag: value.name().to_ascii_lowercase(),
        attrs,
        children,
    })
}
