//! Telegraph page-creation client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::node::Node;
use crate::error::{ProcessError, ProcessResult};

/// Longest title the API stores.
const MAX_TITLE_CHARS: usize = 256;

/// Longest author URL the API stores.
const MAX_AUTHOR_URL_CHARS: usize = 512;

#[derive(Serialize)]
struct CreatePageRequest<'a> {
    access_token: &'a str,
    title: &'a str,
    author_url: &'a str,
    content: &'a [Node],
    return_content: bool,
}

#[derive(Deserialize)]
struct CreatePageResponse {
    ok: bool,
    result: Option<CreatedPage>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct CreatedPage {
    url: String,
}

/// Thin client over the page-creation endpoint.
#[derive(Debug, Clone)]
pub struct TelegraphClient {
    http: Client,
    api_url: String,
}

impl TelegraphClient {
    /// Client against the given endpoint.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
        }
    }

    /// Create one page and return its address.
    ///
    /// Title and author URL are truncated to the service limits before
    /// submission. A non-2xx status or an `ok: false` body both map to
    /// [`ProcessError::PublishFailed`].
    pub async fn create_page(
        &self,
        token: &str,
        title: &str,
        author_url: &str,
        content: &[Node],
    ) -> ProcessResult<String> {
        let request = CreatePageRequest {
            access_token: token,
            title: truncate_chars(title, MAX_TITLE_CHARS),
            author_url: truncate_chars(author_url, MAX_AUTHOR_URL_CHARS),
            content,
            return_content: false,
        };

        let response = self
            .http
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProcessError::PublishFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProcessError::PublishFailed(format!(
                "API returned {status}"
            )));
        }

        let body: CreatePageResponse = response
            .json()
            .await
            .map_err(|e| ProcessError::PublishFailed(format!("invalid API response: {e}")))?;

        if !body.ok {
            return Err(ProcessError::PublishFailed(
                body.error.unwrap_or_else(|| "unknown API error".to_string()),
            ));
        }

        match body.result {
            Some(page) => {
                debug!(url = %page.url, "page created");
                Ok(page.url)
            }
            None => Err(ProcessError::PublishFailed(
                "API reported success without a page".to_string(),
            )),
        }
    }
}

/// Truncate to a maximum number of characters on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
