//! Publishing backend: content node model, HTML conversion, API client,
//! and the paginating publisher that ties them together.

pub mod client;
pub mod convert;
pub mod node;
pub mod publisher;

pub use client::TelegraphClient;
pub use convert::html_to_nodes;
pub use node::{Node, NodeAttrs, NodeElement};
pub use publisher::{PublishOutcome, Publisher};
