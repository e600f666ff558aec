#![deny(missing_docs)]
//! folio rendering: node renderer registry, generic mdast engine, pipeline and batch rendering.

/// Parallel rendering of independent documents.
pub mod batch;
/// Rendering pipeline and configuration.
pub mod pipeline;
/// Overrides for image, raw HTML and code nodes.
pub mod registry;
/// Node renderers and the generic mdast engine.
pub mod renderer;

pub use batch::{BatchInput, BatchOptions, BatchOutcome, BatchResult, BatchStats, render_batch};
pub use folio_core::{
    DiagnosticKind, NodeDiagnostic, NodeError, RenderDiagnostics, RenderError, ResolveError,
};
pub use pipeline::{ContentRenderer, RenderConfig, RenderOptions, pick_source, render};
pub use registry::{NodeOutput, RendererRegistry};
pub use renderer::{
    AssetResolver, CdnImageResolver, CodeStyle, Highlighter, HtmlOutput, ImageOptions,
    PlainHighlighter, RenderBlock, RenderedDocument, ResolvedImage, SrcSetEntry, StaticResolver,
    SyntectHighlighter,
};
