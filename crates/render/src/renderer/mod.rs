/// Code block highlighting.
pub mod highlight;
/// Raw HTML allow-list.
pub mod html_guard;
/// Responsive images.
pub mod image;
/// Generic mdast engine.
pub mod mdast;
/// Built-in asset resolvers.
pub mod resolver;

pub use highlight::{
    CodeStyle, DEFAULT_CODE_LANGUAGE, DEFAULT_CODE_THEME, HighlightedCode, Highlighter,
    PlainHighlighter, SyntectHighlighter, render_code,
};
pub use html_guard::{HtmlOutput, TRUSTED_EMBED_PREFIX, guard_html, render_html_raw};
pub use image::{
    AssetResolver, IMAGE_CLASS, ImageElement, ImageOutput, RenderedImage, ResolvedImage,
    SrcSetEntry, render_image,
};
pub use mdast::{RenderBlock, RenderedDocument, render_tree};
pub use resolver::{CdnImageResolver, ImageOptions, StaticResolver};
