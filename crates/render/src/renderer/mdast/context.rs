//! Rendering context for the mdast renderer.

use super::footnote::Footnotes;
use super::types::{RenderBlock, RenderedDocument, Scope};
use crate::registry::{NodeOutput, RendererRegistry};
use folio_core::{NodeError, RenderDiagnostics, SourceLocation};
use markdown::unist::Position;

/// Manages the current rendering state with block-based architecture.
///
/// This struct tracks the rendering context as we traverse the markdown AST,
/// maintaining a list of completed blocks and a current HTML buffer for
/// content that hasn't been finalized into a block yet.
pub struct Context<'a> {
    /// Completed rendering blocks (HTML or Code).
    pub blocks: Vec<RenderBlock>,

    /// Current HTML buffer (not yet finalized into a block).
    pub current_html: String,

    stack: Vec<Scope>,

    /// Node overrides for images, raw HTML and code.
    registry: &'a RendererRegistry<'a>,

    diagnostics: RenderDiagnostics,

    footnotes: Footnotes,
}

impl<'a> Context<'a> {
    /// Creates a new context over a registry.
    pub fn new(registry: &'a RendererRegistry<'a>) -> Self {
        Self {
            blocks: Vec::new(),
            current_html: String::with_capacity(4096),
            stack: vec![Scope::Root],
            registry,
            diagnostics: RenderDiagnostics::new(),
            footnotes: Footnotes::default(),
        }
    }

    /// Returns the node renderer registry.
    pub fn registry(&self) -> &'a RendererRegistry<'a> {
        self.registry
    }

    /// Writes a raw string to the current HTML buffer without escaping (for safe HTML tags).
    pub fn push_raw(&mut self, s: &str) {
        self.current_html.push_str(s);
    }

    /// Writes text content to the buffer with HTML escaping.
    pub fn push_text(&mut self, s: &str) {
        html_escape::encode_text_to_string(s, &mut self.current_html);
    }

    /// Writes an HTML-escaped attribute value to the buffer.
    pub fn push_attr_value(&mut self, s: &str) {
        html_escape::encode_double_quoted_attribute_to_string(s, &mut self.current_html);
    }

    /// Returns true if any scope in the stack is a List.
    pub fn is_in_list(&self) -> bool {
        self.stack
            .iter()
            .any(|scope| matches!(scope, Scope::List { .. }))
    }

    /// Returns true if inside a tight (non-spread) list.
    ///
    /// Used to suppress `<p>` wrappers around list item content.
    pub fn is_in_tight_list(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|scope| matches!(scope, Scope::List { .. }))
            .is_some_and(|scope| matches!(scope, Scope::List { spread: false }))
    }

    /// Returns true if any scope in the stack is within a table structure.
    ///
    /// Table content must remain phrasing content; inserting block
    /// boundaries inside <table>/<tr>/<td> produces invalid HTML.
    pub fn is_in_table(&self) -> bool {
        self.stack
            .iter()
            .any(|scope| matches!(scope, Scope::Table | Scope::TableRow | Scope::TableCell))
    }

    /// Returns true if currently in a paragraph scope.
    pub fn is_in_paragraph(&self) -> bool {
        self.stack
            .iter()
            .any(|scope| matches!(scope, Scope::Paragraph))
    }

    /// Returns true inside phrasing content, where block wrappers are invalid.
    pub fn is_in_phrasing(&self) -> bool {
        self.stack
            .iter()
            .any(|scope| matches!(scope, Scope::Paragraph | Scope::Heading | Scope::TableCell))
    }

    /// Returns true while a footnote definition is being rendered.
    pub fn is_in_footnote(&self) -> bool {
        self.stack.iter().any(|scope| matches!(scope, Scope::Footnote))
    }

    /// Enters a new scope by pushing it onto the stack.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Exits the current scope by popping from the stack.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Finalizes the current HTML buffer into an HTML block.
    ///
    /// If the current HTML buffer is empty, this is a no-op.
    pub fn flush_html(&mut self) {
        if !self.current_html.is_empty() {
            let content = std::mem::take(&mut self.current_html);
            self.blocks.push(RenderBlock::Html { content });
        }
    }

    /// Emits the output of an overridden node renderer.
    ///
    /// Code blocks become their own block at the top level and stay inline
    /// inside lists, tables, paragraphs and footnotes so those structures
    /// are not split. Embeds in phrasing content get an inline wrapper.
    pub fn push_override(&mut self, output: NodeOutput, position: Option<&Position>) {
        if let Some(error) = output.error() {
            self.report(error, position);
        }

        match output {
            NodeOutput::Image(image) => image.output.write_html(&mut self.current_html),
            NodeOutput::Html(html) if self.is_in_phrasing() => {
                html.write_inline_html(&mut self.current_html)
            }
            NodeOutput::Html(html) => html.write_html(&mut self.current_html),
            NodeOutput::Code(code) => {
                if self.is_in_list()
                    || self.is_in_table()
                    || self.is_in_paragraph()
                    || self.is_in_footnote()
                {
                    self.current_html.push_str(&code.html);
                } else {
                    self.flush_html();
                    self.blocks.push(code.into());
                }
            }
        }
    }

    /// Numbers a footnote reference and writes its superscript link.
    pub fn push_footnote_call(&mut self, identifier: &str) {
        let call = self.footnotes.call(identifier);
        Footnotes::write_call(identifier, call, &mut self.current_html);
    }

    /// Renders a footnote body apart from the main flow and stores it for
    /// the trailing section.
    pub fn capture_footnote(&mut self, identifier: &str, render: impl FnOnce(&mut Self)) {
        let outer = std::mem::take(&mut self.current_html);
        self.enter(Scope::Footnote);
        render(self);
        self.exit();
        let body = std::mem::replace(&mut self.current_html, outer);
        self.footnotes.define(identifier, body);
    }

    /// Records a node-local failure and logs it.
    pub fn report(&mut self, error: &NodeError, position: Option<&Position>) {
        let location = position.map(|p| SourceLocation::new(p.start.line, p.start.column));
        match &location {
            Some(location) => log::warn!("Node rendered with fallback at {}: {}", location, error),
            None => log::warn!("Node rendered with fallback: {}", error),
        }
        self.diagnostics.record(error, location);
    }

    /// Appends the footnote section, flushes pending HTML and returns the
    /// finished document.
    pub fn finish(mut self, class_name: Option<String>) -> RenderedDocument {
        self.footnotes.write_section(&mut self.current_html);
        self.flush_html();
        RenderedDocument {
            class_name,
            blocks: self.blocks,
            diagnostics: self.diagnostics,
        }
    }
}
