//! Type definitions for the mdast renderer.

use crate::renderer::highlight::HighlightedCode;
use folio_core::RenderDiagnostics;
use serde::Serialize;

/// CSS class of the document container.
pub const CONTENT_CLASS: &str = "Content";

/// Represents a rendering block handed to the display layer.
///
/// Each block is either finished HTML or a highlighted code block.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderBlock {
    /// Plain HTML content.
    Html {
        /// The HTML content string.
        content: String,
    },

    /// A top-level code block.
    Code {
        /// The code content.
        code: String,
        /// Language it was highlighted as.
        language: String,
        /// Theme it was highlighted with.
        theme: String,
        /// Highlighted HTML.
        html: String,
    },
}

impl From<HighlightedCode> for RenderBlock {
    fn from(code: HighlightedCode) -> Self {
        RenderBlock::Code {
            code: code.code,
            language: code.language,
            theme: code.theme,
            html: code.html,
        }
    }
}

impl RenderBlock {
    /// Appends the block as HTML.
    pub fn write_html(&self, out: &mut String) {
        match self {
            RenderBlock::Html { content } => out.push_str(content),
            RenderBlock::Code { html, .. } => out.push_str(html),
        }
    }
}

/// A rendered markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    /// Extra class added to the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Blocks in document order.
    pub blocks: Vec<RenderBlock>,
    /// Node-local failures that were replaced by fallbacks.
    pub diagnostics: RenderDiagnostics,
}

impl RenderedDocument {
    /// Class attribute of the container: `Content` plus the caller's class.
    pub fn container_class(&self) -> String {
        match self.class_name.as_deref().map(str::trim) {
            Some(class) if !class.is_empty() => format!("{CONTENT_CLASS} {class}"),
            _ => CONTENT_CLASS.to_string(),
        }
    }

    /// Serializes the document wrapped in its container `<div>`.
    pub fn to_html(&self) -> String {
        let mut out = String::from(r#"<div class=""#);
        html_escape::encode_double_quoted_attribute_to_string(self.container_class(), &mut out);
        out.push_str(r#"">"#);
        for block in &self.blocks {
            block.write_html(&mut out);
        }
        out.push_str("</div>");
        out
    }
}

/// Represents the type of scope currently being rendered.
///
/// Used in the Context stack to track which HTML element we are currently
/// inside of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Document root - not inside any specific block element.
    Root,
    /// Inside a paragraph, with or without its `<p>` wrapper.
    Paragraph,
    /// Inside a heading element (`<h1>`..`<h6>`).
    Heading,
    /// Inside a list element (`<ul>` or `<ol>`).
    List {
        /// Whether the list is loose.
        spread: bool,
    },
    /// Inside a table element (`<table>`).
    Table,
    /// Inside a table row element (`<tr>`).
    TableRow,
    /// Inside a table cell element (`<td>` or `<th>`).
    TableCell,
    /// Inside a footnote definition, rendered apart from the main flow.
    Footnote,
}
