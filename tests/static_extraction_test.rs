//! Static-tier extraction over live HTTP against a mock article server.

use mockito::Server;
use readpress::config::CHROME_USER_AGENT;
use readpress::{Config, ProcessError, Renderer, StaticReadabilityTier, TieredExtractor};

/// A server-rendered article page substantial enough for structured
/// extraction to find the body without any rendering.
fn article_page() -> String {
    let paragraphs: String = (0..10)
        .map(|i| {
            format!(
                "<p>Paragraph {i} walks the perimeter fence of the signal garden, \
                 noting which antennas survived the winter and which lean, wires \
                 slack, waiting for the spring crew to set them upright again.</p>"
            )
        })
        .collect();
    format!(
        "<html><head><title>The Signal Garden</title></head><body>\
         <article><h1>The Signal Garden</h1>{paragraphs}</article>\
         </body></html>"
    )
}

/// Extractor whose chain ends at the static tier, so a miss surfaces
/// without ever needing a browser.
fn static_only(config: &Config) -> TieredExtractor {
    TieredExtractor::with_tiers(
        config,
        Renderer::new(config),
        vec![Box::new(StaticReadabilityTier::new())],
    )
}

#[tokio::test]
async fn static_tier_alone_extracts_a_served_article() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/story")
        .match_header("user-agent", CHROME_USER_AGENT)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(article_page())
        .create_async()
        .await;

    let config = Config::default();
    let extractor = TieredExtractor::new(&config, Renderer::new(&config));

    // A passing extraction here comes purely from the HTTP fetch; the
    // rendered tiers would need a live browser.
    let url = format!("{}/story", server.url());
    let extraction = extractor.extract(&url).await.expect("static tier extracts");

    mock.assert_async().await;
    assert_eq!(extraction.title, "The Signal Garden");
    assert!(extraction.content.contains("perimeter fence"));
    assert_eq!(extraction.source_url, url);
}

#[tokio::test]
async fn rejected_status_escalates_instead_of_erroring() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/gone")
        .with_status(404)
        .with_body("nothing here")
        .create_async()
        .await;

    let config = Config::default();
    let err = static_only(&config)
        .extract(&format!("{}/gone", server.url()))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ProcessError::ExtractionFailed));
}

#[tokio::test]
async fn unreachable_host_escalates_instead_of_erroring() {
    let config = Config::default();
    let err = static_only(&config)
        .extract("http://127.0.0.1:1/unreachable")
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::ExtractionFailed));
}

#[tokio::test]
async fn thin_served_page_is_a_content_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/stub")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            "<html><head><title>Stub</title></head><body>\
             <article><p>too little</p></article></body></html>",
        )
        .create_async()
        .await;

    let config = Config::default();
    let err = static_only(&config)
        .extract(&format!("{}/stub", server.url()))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.is_content_failure(), "got {err:?}");
}
