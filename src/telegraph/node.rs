//! Wire model for Telegraph content nodes.
//!
//! A node is either a bare text leaf or an element with a tag, an optional
//! `href`/`src` attribute pair, and optional children. Fields absent from
//! the tree are omitted from the serialized form entirely, matching what the
//! API expects.

use serde::{Deserialize, Serialize};

/// One node of the publishable content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Plain text leaf, serialized as a bare JSON string
    Text(String),
    /// Element node
    Element(NodeElement),
}

/// Element node: tag plus optional attributes and children.
///
/// An element with `children: None` is a void element on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<NodeAttrs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

/// The only attributes that survive conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl Node {
    /// Text leaf from anything string-like.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl NodeElement {
    /// Bare element with no attributes or children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: None,
            children: None,
        }
    }
}

impl NodeAttrs {
    /// True when neither attribute is set; such an object is omitted from
    /// the tree rather than serialized empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.href.is_none() && self.src.is_none()
    }
}
