//! Content-quality signals shared by tier gating and final acceptance.

use regex::Regex;
use std::sync::LazyLock;

use crate::sanitize::sanitize;

/// Notices some platforms serve in place of an article when it was deleted,
/// is app-only, or was taken down for policy reasons.
const BLOCKED_PATTERNS: [&str; 3] = [
    "该内容已被发布者删除",
    "请在微信客户端打开链接",
    "此内容因违规无法查看",
];

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("BUG: hardcoded tag regex is invalid"));

/// True when the markup carries a block-page notice instead of an article.
pub(crate) fn is_blocked(content: &str) -> bool {
    let text = TAG_RE.replace_all(content, "");
    BLOCKED_PATTERNS.iter().any(|p| text.contains(p))
}

/// True when the text left after sanitization is below the publishable
/// minimum. Catches empty extractions as well as boilerplate-only pages.
pub(crate) fn is_too_short(content: &str, min_chars: usize) -> bool {
    let sanitized = sanitize(content);
    let text = TAG_RE.replace_all(&sanitized, "");
    text.trim().chars().count() < min_chars
}
