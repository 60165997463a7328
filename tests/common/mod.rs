//! Shared helpers for the readpress test suite.

use mockito::{Matcher, Mock, Server};
use serde_json::json;

/// Mock a successful page-creation call, routed by exact page title.
#[allow(dead_code)]
pub async fn mock_create_page(server: &mut Server, title: &str, address: &str) -> Mock {
    server
        .mock("POST", "/createPage")
        .match_body(Matcher::PartialJson(json!({ "title": title })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "ok": true, "result": { "url": address } }).to_string())
        .create_async()
        .await
}

/// Like [`mock_create_page`], but the body must also carry a trailing
/// next-page link pointing at `next_address`.
#[allow(dead_code)]
pub async fn mock_create_page_with_link(
    server: &mut Server,
    title: &str,
    address: &str,
    next_address: &str,
) -> Mock {
    server
        .mock("POST", "/createPage")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "title": title })),
            Matcher::Regex(format!("{}.*Next page", regex::escape(next_address))),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "ok": true, "result": { "url": address } }).to_string())
        .create_async()
        .await
}

/// Mock a rejection from the publish API.
#[allow(dead_code)]
pub async fn mock_create_page_error(server: &mut Server, error: &str) -> Mock {
    server
        .mock("POST", "/createPage")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "ok": false, "error": error }).to_string())
        .create_async()
        .await
}

/// Article markup comfortably longer than the minimum-length gate.
#[allow(dead_code)]
pub fn long_article_html() -> String {
    format!(
        "<p>{}</p><p>{}</p>",
        "An opening paragraph that easily clears the fifty character minimum.",
        "A second paragraph so the converted node sequence has some shape."
    )
}
