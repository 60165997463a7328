// readpress: turn article URLs into paginated Telegraph pages.
//
// Usage: readpress <url-or-text> [<url-or-text>...]
// Publish credentials come from TELEGRAPH_TOKEN_0..9 in the environment.

use anyhow::Result;
use readpress::{Config, Pipeline, extract_urls};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        anyhow::bail!("usage: readpress <url-or-text> [<url-or-text>...]");
    }

    // Each argument is either a URL itself or text with URLs buried in it,
    // as when a message is pasted wholesale.
    let mut urls = Vec::new();
    for arg in &args {
        let found = extract_urls(arg);
        if found.is_empty() {
            urls.push(arg.clone());
        } else {
            urls.extend(found);
        }
    }

    let pipeline = Pipeline::new(Config::from_env());

    let mut saw_rejected = false;
    let mut saw_content_failure = false;
    let mut saw_system_failure = false;
    for url in &urls {
        match pipeline.process_url(url).await {
            Ok(outcome) => println!("{}", outcome.address),
            Err(e) => {
                eprintln!("{url}: {e}");
                if e.is_rejected_input() {
                    saw_rejected = true;
                } else if e.is_content_failure() {
                    saw_content_failure = true;
                } else {
                    saw_system_failure = true;
                }
            }
        }
    }

    pipeline.shutdown().await;

    // Worst failure class wins the exit status: system and publish errors
    // over unusable pages over rejected URLs.
    if saw_system_failure {
        std::process::exit(1);
    }
    if saw_content_failure {
        std::process::exit(3);
    }
    if saw_rejected {
        std::process::exit(2);
    }
    Ok(())
}
