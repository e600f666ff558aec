use serde::Serialize;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that abort a whole render call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The caller supplied no markdown text (missing or empty).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
}

impl RenderError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

/// A percent-encoded URI that could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `%` not followed by two hex digits.
    #[error("malformed percent escape at byte {offset}")]
    MalformedEscape {
        /// Byte offset of the offending `%`
        offset: usize,
    },
    /// The decoded bytes are not valid UTF-8.
    #[error("decoded URI is not valid UTF-8")]
    InvalidUtf8,
}

/// Failure reported by an asset resolver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No asset is known for the path.
    #[error("no asset found for '{0}'")]
    NotFound(String),
    /// The resolver knows the path but cannot build a source set for it.
    #[error("cannot resolve '{path}': {reason}")]
    Invalid {
        /// Requested path
        path: String,
        /// Why resolution failed
        reason: String,
    },
}

/// Errors confined to a single node. Siblings keep rendering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Image URI could not be percent-decoded.
    #[error("cannot decode image URI '{uri}': {source}")]
    Decode {
        /// The URI as found in the document
        uri: String,
        /// Underlying decode failure
        #[source]
        source: DecodeError,
    },
    /// Asset resolver could not produce a URL set.
    #[error("asset resolver failed: {0}")]
    Resolver(#[from] ResolveError),
}

/// Which node-local condition a diagnostic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// See [`NodeError::Decode`].
    DecodeError,
    /// See [`NodeError::Resolver`].
    ResolverFailure,
}

impl From<&NodeError> for DiagnosticKind {
    fn from(err: &NodeError) -> Self {
        match err {
            NodeError::Decode { .. } => DiagnosticKind::DecodeError,
            NodeError::Resolver(_) => DiagnosticKind::ResolverFailure,
        }
    }
}

/// A node-local failure that was replaced by a fallback rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDiagnostic {
    /// Condition category
    pub kind: DiagnosticKind,
    /// Human readable message
    pub message: String,
    /// Position of the node in the normalized source, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl NodeDiagnostic {
    /// Build a diagnostic from a node error.
    pub fn from_error(error: &NodeError, location: Option<SourceLocation>) -> Self {
        Self {
            kind: error.into(),
            message: error.to_string(),
            location,
        }
    }
}

impl std::fmt::Display for NodeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Collection of node diagnostics gathered during one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderDiagnostics {
    /// Diagnostics in document order
    pub entries: Vec<NodeDiagnostic>,
}

impl RenderDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node error
    pub fn record(&mut self, error: &NodeError, location: Option<SourceLocation>) {
        self.entries.push(NodeDiagnostic::from_error(error, location));
    }

    /// Check if there are any diagnostics
    pub fn has_any(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Count diagnostics of one kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}
