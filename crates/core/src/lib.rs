#![deny(missing_docs)]
//! folio core: link destination normalization, URI codec, markdown parsing and errors.

/// Core error and diagnostic types.
pub mod error;
/// Link destination scanning and encoding.
pub mod links;
/// Markdown parsing utilities and preprocessing hooks.
pub mod parse;
/// Percent-encoding helpers for link destinations.
pub mod uri;

pub use error::{
    DecodeError, DiagnosticKind, NodeDiagnostic, NodeError, RenderDiagnostics, RenderError,
    ResolveError, SourceLocation,
};
pub use links::{LinkSpan, encode_link_destinations, find_link_spans};
pub use parse::{ParseOptions, ParserPipeline, TextTransform, parse_mdast, parse_mdast_with_options};
pub use uri::{decode_uri, encode_uri};
