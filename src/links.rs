//! URL admission rules.
//!
//! Normalization, validation, and the skip list applied before a URL enters
//! the pipeline.

use std::sync::LazyLock;

use regex::Regex;

/// Hosts the pipeline refuses outright: pages that are already published
/// reader views, video platforms, messenger deep links, and a known captcha
/// interstitial.
static SKIP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://(www\.)?(graph\.org|telegra\.ph)",
        r"^https?://(www\.)?(youtube\.com|youtu\.be)",
        r"^https?://t\.me/",
        r"^https?://(www\.)?yandex\.ru/showcap",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("BUG: hardcoded skip pattern is invalid"))
    .collect()
});

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("BUG: hardcoded scheme pattern is invalid"));

/// Embedded redirect target in search-engine result links (`?url=` / `&url=`).
static REDIRECT_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]url=([^&]+)").expect("BUG: hardcoded redirect pattern is invalid"));

/// Bare http(s) URLs inside free-form text.
static URL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"{}|\\^`\[\]]+"#)
        .expect("BUG: hardcoded URL pattern is invalid")
});

/// Normalize a raw user-supplied URL.
///
/// Trims whitespace, prefixes `https://` when no scheme is present, and
/// unwraps redirect wrappers that carry the real target in a `url=` query
/// parameter.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let with_scheme = if SCHEME_PREFIX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    if let Some(caps) = REDIRECT_PARAM.captures(&with_scheme) {
        if let Some(target) = caps.get(1) {
            if let Ok(decoded) = urlencoding::decode(target.as_str()) {
                return decoded.into_owned();
            }
        }
    }

    with_scheme
}

/// Check that a URL parses and uses an http(s) scheme.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Check whether a URL belongs to a platform the pipeline does not process.
#[must_use]
pub fn should_skip_url(url: &str) -> bool {
    SKIP_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Pull every http(s) URL out of free-form text, in order of appearance.
#[must_use]
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_IN_TEXT
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme() {
        assert_eq!(normalize_url("example.com/post"), "https://example.com/post");
        assert_eq!(
            normalize_url("  http://example.com  "),
            "http://example.com"
        );
    }

    #[test]
    fn normalize_unwraps_redirect_param() {
        let wrapped = "https://www.google.com/url?sa=t&url=https%3A%2F%2Fexample.com%2Fstory&usg=x";
        assert_eq!(normalize_url(wrapped), "https://example.com/story");
    }

    #[test]
    fn validation_requires_http_scheme() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/a?b=c"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
    }

    #[test]
    fn skip_list_covers_published_and_excluded_platforms() {
        assert!(should_skip_url("https://telegra.ph/Some-Page-01-01"));
        assert!(should_skip_url("https://graph.org/x"));
        assert!(should_skip_url("https://www.youtube.com/watch?v=abc"));
        assert!(should_skip_url("https://youtu.be/abc"));
        assert!(should_skip_url("https://t.me/somechannel/42"));
        assert!(should_skip_url("https://yandex.ru/showcaptcha?x=1"));
        assert!(!should_skip_url("https://example.com/article"));
    }

    #[test]
    fn extracts_urls_from_surrounding_text() {
        let text = "read https://example.com/a then HTTP://other.org/b?x=1 done";
        assert_eq!(
            extract_urls(text),
            vec!["https://example.com/a", "HTTP://other.org/b?x=1"]
        );
        assert!(extract_urls("no links here").is_empty());
    }

    #[test]
    fn extraction_stops_at_delimiters() {
        let text = r#"<a href="https://example.com/page">link</a> {https://x.io/y}"#;
        assert_eq!(extract_urls(text), vec!["https://example.com/page", "https://x.io/y"]);
    }
}
