//! Raw HTML allow-list.
//!
//! Authored raw HTML is only trusted when it is an iframe embed. Every other
//! block is emitted as escaped text so the browser never interprets it.
//!
//! Each embed is written as a self-contained fragment. Inline HTML arrives
//! one tag per node, so an opening `<iframe …>` is closed here and the
//! authored `</iframe>` that follows it is absorbed by the engine.

use markdown::mdast::Html;
use serde::Serialize;

/// Prefix a raw HTML block must start with, at position 0, to be trusted.
pub const TRUSTED_EMBED_PREFIX: &str = "<iframe";

/// CSS class of the wrapper around trusted embeds.
pub const IFRAME_CLASS: &str = "Content--Iframe";

const EMBED_CLOSE: &str = "</iframe";

/// Outcome of guarding a raw HTML value.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum HtmlOutput {
    /// Trusted embed, emitted verbatim inside the iframe wrapper.
    Embed(String),
    /// Untrusted markup, emitted as escaped text.
    Inert(String),
}

impl HtmlOutput {
    /// Returns true for trusted embeds.
    pub fn is_embed(&self) -> bool {
        matches!(self, HtmlOutput::Embed(_))
    }

    /// Appends the output as HTML, wrapping embeds in a `<div>`.
    pub fn write_html(&self, out: &mut String) {
        self.write_wrapped("div", out);
    }

    /// Appends the output as phrasing HTML, wrapping embeds in a `<span>`.
    pub fn write_inline_html(&self, out: &mut String) {
        self.write_wrapped("span", out);
    }

    fn write_wrapped(&self, tag: &str, out: &mut String) {
        match self {
            HtmlOutput::Embed(value) => {
                out.push('<');
                out.push_str(tag);
                out.push_str(r#" class=""#);
                out.push_str(IFRAME_CLASS);
                out.push_str(r#"">"#);
                out.push_str(value);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            HtmlOutput::Inert(value) => {
                html_escape::encode_text_to_string(value, out);
            }
        }
    }
}

/// Returns true for a trusted value that opens an iframe without closing it.
pub fn opens_unclosed_embed(value: &str) -> bool {
    value.starts_with(TRUSTED_EMBED_PREFIX) && !value.contains(EMBED_CLOSE)
}

/// Returns true for a lone closing `</iframe>` tag.
pub fn closes_embed(value: &str) -> bool {
    value.trim_start().starts_with(EMBED_CLOSE)
}

/// Classifies a raw HTML value.
///
/// The prefix check is exact: case-sensitive, no leading whitespace. A
/// trusted value carrying other markup stays trusted as a whole, and one
/// that never closes its iframe gets `</iframe>` appended.
pub fn guard_html(value: &str) -> HtmlOutput {
    if opens_unclosed_embed(value) {
        HtmlOutput::Embed(format!("{value}</iframe>"))
    } else if value.starts_with(TRUSTED_EMBED_PREFIX) {
        HtmlOutput::Embed(value.to_string())
    } else {
        log::debug!("Raw HTML is not an embed and will be escaped: {}", value);
        HtmlOutput::Inert(value.to_string())
    }
}

/// Renders a raw HTML node through the allow-list.
pub fn render_html_raw(html: &Html) -> HtmlOutput {
    guard_html(&html.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_html(value: &str) -> String {
        let mut out = String::new();
        guard_html(value).write_html(&mut out);
        out
    }

    #[test]
    fn test_iframe_is_wrapped() {
        let iframe = r#"<iframe src="https://x"></iframe>"#;
        assert_eq!(guard_html(iframe), HtmlOutput::Embed(iframe.to_string()));
        assert_eq!(
            to_html(iframe),
            r#"<div class="Content--Iframe"><iframe src="https://x"></iframe></div>"#
        );
    }

    #[test]
    fn test_other_html_is_escaped() {
        assert_eq!(
            to_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert!(!guard_html("<div>hi</div>").is_embed());
    }

    #[test]
    fn test_prefix_check_is_exact() {
        assert!(!guard_html(" <iframe src=\"x\"></iframe>").is_embed());
        assert!(!guard_html("<IFRAME src=\"x\"></IFRAME>").is_embed());
        assert!(!guard_html("<div><iframe src=\"x\"></iframe></div>").is_embed());
        assert!(guard_html("<iframe").is_embed());
    }

    #[test]
    fn test_unclosed_iframe_is_closed() {
        assert_eq!(
            guard_html(r#"<iframe src="https://x">"#),
            HtmlOutput::Embed(r#"<iframe src="https://x"></iframe>"#.to_string())
        );
        assert!(opens_unclosed_embed(r#"<iframe src="https://x">"#));
        assert!(!opens_unclosed_embed(r#"<iframe src="https://x"></iframe>"#));
        assert!(closes_embed("</iframe>"));
        assert!(!closes_embed("</div>"));
    }

    #[test]
    fn test_embed_with_trailing_markup_stays_whole() {
        let block = "<iframe src=\"https://x\"></iframe>\n<p>caption</p>";
        assert_eq!(guard_html(block), HtmlOutput::Embed(block.to_string()));
        assert_eq!(
            to_html(block),
            "<div class=\"Content--Iframe\"><iframe src=\"https://x\"></iframe>\n<p>caption</p></div>"
        );
    }

    #[test]
    fn test_inline_embed_uses_span_wrapper() {
        let mut out = String::new();
        guard_html(r#"<iframe src="https://x">"#).write_inline_html(&mut out);
        assert_eq!(
            out,
            r#"<span class="Content--Iframe"><iframe src="https://x"></iframe></span>"#
        );

        let mut out = String::new();
        guard_html("<b>").write_inline_html(&mut out);
        assert_eq!(out, "&lt;b&gt;");
    }

    #[test]
    fn test_render_html_raw_reads_node_value() {
        let node = Html {
            value: "<b>bold</b>".to_string(),
            position: None,
        };
        assert_eq!(
            render_html_raw(&node),
            HtmlOutput::Inert("<b>bold</b>".to_string())
        );
    }
}
