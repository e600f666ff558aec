//! Node renderer registry.
//!
//! Three node kinds are rendered by dedicated renderers instead of the
//! generic engine: images, raw HTML and code blocks. The registry is built
//! once per render call from the caller's collaborators.

use crate::renderer::highlight::{CodeStyle, HighlightedCode, Highlighter, render_code};
use crate::renderer::html_guard::{HtmlOutput, render_html_raw};
use crate::renderer::image::{AssetResolver, RenderedImage, render_image};
use folio_core::NodeError;
use markdown::mdast::Node;

/// Output of an overridden node renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutput {
    /// A rendered image or its fallback.
    Image(RenderedImage),
    /// Guarded raw HTML.
    Html(HtmlOutput),
    /// A highlighted code block.
    Code(HighlightedCode),
}

impl NodeOutput {
    /// Node-local failure behind a fallback, if any.
    pub fn error(&self) -> Option<&NodeError> {
        match self {
            NodeOutput::Image(image) => image.error.as_ref(),
            NodeOutput::Html(_) | NodeOutput::Code(_) => None,
        }
    }
}

/// Overrides for the image, raw HTML and code node kinds.
pub struct RendererRegistry<'a> {
    resolver: &'a dyn AssetResolver,
    highlighter: &'a dyn Highlighter,
    code_style: CodeStyle,
}

impl<'a> RendererRegistry<'a> {
    /// Creates a registry over the given collaborators.
    pub fn new(
        resolver: &'a dyn AssetResolver,
        highlighter: &'a dyn Highlighter,
        code_style: CodeStyle,
    ) -> Self {
        Self {
            resolver,
            highlighter,
            code_style,
        }
    }

    /// Renders `node` with its override, or returns `None` for node kinds
    /// left to the generic engine.
    pub fn dispatch(&self, node: &Node) -> Option<NodeOutput> {
        match node {
            Node::Image(image) => Some(NodeOutput::Image(render_image(image, self.resolver))),
            Node::Html(html) => Some(NodeOutput::Html(render_html_raw(html))),
            Node::Code(code) => Some(NodeOutput::Code(render_code(
                code,
                self.highlighter,
                &self.code_style,
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::highlight::PlainHighlighter;
    use crate::renderer::image::ResolvedImage;
    use folio_core::ResolveError;
    use markdown::mdast::{Code, Html, Image, Text};

    fn identity(path: &str) -> Result<ResolvedImage, ResolveError> {
        Ok(ResolvedImage::new(path, [(path, "1x")]))
    }

    #[test]
    fn test_dispatches_overridden_kinds() {
        let registry = RendererRegistry::new(&identity, &PlainHighlighter, CodeStyle::default());

        let image = Node::Image(Image {
            url: "a.png".to_string(),
            alt: "a".to_string(),
            title: None,
            position: None,
        });
        let html = Node::Html(Html {
            value: "<iframe></iframe>".to_string(),
            position: None,
        });
        let code = Node::Code(Code {
            value: "1".to_string(),
            lang: None,
            meta: None,
            position: None,
        });

        assert!(matches!(registry.dispatch(&image), Some(NodeOutput::Image(_))));
        assert!(matches!(
            registry.dispatch(&html),
            Some(NodeOutput::Html(HtmlOutput::Embed(_)))
        ));
        assert!(matches!(registry.dispatch(&code), Some(NodeOutput::Code(_))));
    }

    #[test]
    fn test_code_style_reaches_every_code_block() {
        let style = CodeStyle {
            language: "rust".to_string(),
            theme: "base16-ocean.dark".to_string(),
        };
        let registry = RendererRegistry::new(&identity, &PlainHighlighter, style);
        let code = Node::Code(Code {
            value: "let a = 1;".to_string(),
            lang: Some("python".to_string()),
            meta: None,
            position: None,
        });

        let Some(NodeOutput::Code(highlighted)) = registry.dispatch(&code) else {
            panic!("expected highlighted code");
        };
        assert_eq!(highlighted.language, "rust");
        assert_eq!(highlighted.theme, "base16-ocean.dark");
    }

    #[test]
    fn test_other_kinds_fall_through() {
        let registry = RendererRegistry::new(&identity, &PlainHighlighter, CodeStyle::default());
        let text = Node::Text(Text {
            value: "plain".to_string(),
            position: None,
        });
        assert_eq!(registry.dispatch(&text), None);
    }
}
