//! HTML sanitizer for publishable content.
//!
//! Streaming rewrite (lol_html) that reduces arbitrary markup to the tag and
//! attribute set the publish service accepts. Disallowed tags are unwrapped
//! (their children survive), script-like tags are dropped with their
//! content, and anchors without a usable `href` are removed entirely.

use lol_html::{HtmlRewriter, Settings, doc_comments, element};

/// Tags the publish service supports.
const ALLOWED_TAGS: &[&str] = &[
    "a", "aside", "b", "blockquote", "br", "code", "em", "figcaption", "figure", "h3", "h4", "hr",
    "i", "iframe", "img", "li", "ol", "p", "pre", "s", "strong", "u", "ul", "video",
];

/// Tags whose text content must not leak into the output when the tag is
/// removed.
const DROP_CONTENT_TAGS: &[&str] = &["script", "style", "textarea", "option"];

/// Attributes kept per tag; everything else is stripped.
fn allowed_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href"],
        "img" => &["src", "alt"],
        "iframe" | "video" => &["src"],
        _ => &[],
    }
}

/// Reduce `html` to the allowlisted tag/attribute set.
///
/// Never fails: input that cannot be rewritten collapses to an empty string.
#[must_use]
pub fn sanitize(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("*", |el| {
                let tag = el.tag_name().to_lowercase();

                if DROP_CONTENT_TAGS.contains(&tag.as_str()) {
                    el.remove();
                    return Ok(());
                }
                if !ALLOWED_TAGS.contains(&tag.as_str()) {
                    el.remove_and_keep_content();
                    return Ok(());
                }

                let keep = allowed_attrs(&tag);
                let names: Vec<String> =
                    el.attributes().iter().map(|a| a.name()).collect();
                for name in names {
                    if !keep.contains(&name.as_str()) {
                        el.remove_attribute(&name);
                    }
                }

                // An anchor that lost (or never had) its target is noise,
                // not a link; drop it with its label.
                if tag == "a"
                    && el
                        .get_attribute("href")
                        .filter(|href| !href.is_empty())
                        .is_none()
                {
                    el.remove();
                }

                Ok(())
            })],
            document_content_handlers: vec![doc_comments!(|c| {
                c.remove();
                Ok(())
            })],
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );

    if rewriter.write(html.as_bytes()).is_err() || rewriter.end().is_err() {
        return String::new();
    }

    String::from_utf8(output).unwrap_or_default()
}
