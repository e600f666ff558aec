//! Rendering pipeline: validate, normalize, parse, render.

use crate::registry::RendererRegistry;
use crate::renderer::highlight::{CodeStyle, Highlighter, SyntectHighlighter};
use crate::renderer::image::AssetResolver;
use crate::renderer::mdast::{RenderedDocument, render_tree};
use crate::renderer::resolver::{CdnImageResolver, ImageOptions};
use folio_core::{ParseOptions, ParserPipeline, RenderError};
use serde::{Deserialize, Serialize};

/// Serializable rendering options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Extra class added to the document container.
    pub class_name: Option<String>,
    /// Language and theme for code blocks.
    pub code: CodeStyle,
    /// Image CDN settings for the built-in resolver.
    pub images: ImageOptions,
}

impl RenderOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json)
            .map_err(|err| RenderError::invalid_input(format!("render options: {err}")))
    }
}

/// Collaborators and settings for one render call.
#[derive(Clone)]
pub struct RenderConfig<'a> {
    /// Maps image paths to concrete URLs.
    pub resolver: &'a dyn AssetResolver,
    /// Highlights code blocks.
    pub highlighter: &'a dyn Highlighter,
    /// Extra class added to the document container.
    pub class_name: Option<String>,
    /// Language and theme for code blocks.
    pub code_style: CodeStyle,
}

impl<'a> RenderConfig<'a> {
    /// Creates a config with the default code style and no extra class.
    pub fn new(resolver: &'a dyn AssetResolver, highlighter: &'a dyn Highlighter) -> Self {
        Self {
            resolver,
            highlighter,
            class_name: None,
            code_style: CodeStyle::default(),
        }
    }

    /// Sets the extra container class.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the code style.
    #[must_use]
    pub fn with_code_style(mut self, code_style: CodeStyle) -> Self {
        self.code_style = code_style;
        self
    }
}

/// Renders markdown into a structured document.
///
/// Link destinations are percent-encoded before parsing, so authored URLs
/// with spaces or non-ASCII characters survive the parser. Images, raw HTML
/// and code blocks go through their dedicated renderers.
///
/// # Errors
///
/// Returns [`RenderError::InvalidInput`] when `source` is absent or empty.
/// Failures local to one node never fail the render; they are reported in
/// [`RenderedDocument::diagnostics`].
pub fn render(source: Option<&str>, config: &RenderConfig<'_>) -> Result<RenderedDocument, RenderError> {
    let source = match source {
        Some(text) if !text.is_empty() => text,
        Some(_) => return Err(RenderError::invalid_input("markdown source is empty")),
        None => return Err(RenderError::invalid_input("markdown source is missing")),
    };

    let tree = ParserPipeline::content(ParseOptions::content()).parse(source)?;
    let registry = RendererRegistry::new(config.resolver, config.highlighter, config.code_style.clone());
    let document = render_tree(&tree, &registry, config.class_name.clone());

    if document.diagnostics.has_any() {
        log::debug!(
            "Rendered {} blocks with {} node diagnostics",
            document.blocks.len(),
            document.diagnostics.entries.len()
        );
    }

    Ok(document)
}

/// Picks the markdown text from a `source` and its `src` alias.
///
/// A present, non-empty `source` wins; otherwise `src` is used as given, so
/// both missing still fails as invalid input.
pub fn pick_source<'a>(source: Option<&'a str>, src: Option<&'a str>) -> Option<&'a str> {
    source.filter(|text| !text.is_empty()).or(src)
}

/// Renderer owning the built-in collaborators.
#[derive(Debug, Clone, Default)]
pub struct ContentRenderer {
    options: RenderOptions,
    resolver: CdnImageResolver,
    highlighter: SyntectHighlighter,
}

impl ContentRenderer {
    /// Creates a renderer from options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            resolver: CdnImageResolver::new(options.images.clone()),
            highlighter: SyntectHighlighter::new(),
            options,
        }
    }

    /// Options this renderer was built from.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Borrows the built-in collaborators as a [`RenderConfig`].
    pub fn config(&self) -> RenderConfig<'_> {
        RenderConfig {
            resolver: &self.resolver,
            highlighter: &self.highlighter,
            class_name: self.options.class_name.clone(),
            code_style: self.options.code.clone(),
        }
    }

    /// Renders `source` with the built-in collaborators.
    pub fn render(&self, source: Option<&str>) -> Result<RenderedDocument, RenderError> {
        render(source, &self.config())
    }

    /// Renders whichever of `source` and its `src` alias carries text.
    pub fn render_content(
        &self,
        source: Option<&str>,
        src: Option<&str>,
    ) -> Result<RenderedDocument, RenderError> {
        self.render(pick_source(source, src))
    }
}
