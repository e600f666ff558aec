//! MDAST-based Markdown to HTML renderer.
//!
//! Converts a parsed mdast tree into an ordered list of rendering blocks.
//! Images, raw HTML and code blocks are delegated to the
//! [`RendererRegistry`](crate::registry::RendererRegistry); everything else
//! is rendered by the generic engine in [`render`].
//!
//! # Module Structure
//!
//! - `types` - Output types (RenderBlock, RenderedDocument, Scope)
//! - `context` - Rendering context for tracking state during traversal
//! - `footnote` - Footnote numbering and the trailing footnote section
//! - `render` - AST node rendering functions

mod context;
mod footnote;
pub mod render;
mod types;

pub use context::Context;
pub use types::{CONTENT_CLASS, RenderBlock, RenderedDocument, Scope};

use crate::registry::RendererRegistry;
use markdown::mdast::Node;
use render::render_node;

/// Renders a parsed tree into a document tagged with `class_name`.
pub fn render_tree(
    tree: &Node,
    registry: &RendererRegistry<'_>,
    class_name: Option<String>,
) -> RenderedDocument {
    let mut ctx = Context::new(registry);
    render_node(tree, &mut ctx);
    ctx.finish(class_name)
}
