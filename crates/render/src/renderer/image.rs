//! Responsive image rendering.
//!
//! Image URLs arrive percent-encoded (link destinations are encoded before
//! parsing). They are decoded back to the authored path, handed to an
//! [`AssetResolver`], and emitted as an `<img>` carrying both a primary
//! `src` and a `srcset`.

use folio_core::{NodeError, ResolveError, decode_uri, encode_uri};
use markdown::mdast::Image;
use serde::Serialize;

/// CSS class carried by every rendered content image.
pub const IMAGE_CLASS: &str = "Content--Image";

/// CSS class of the placeholder emitted when an image URI cannot be decoded.
pub const IMAGE_FALLBACK_CLASS: &str = "Content--Image-fallback";

/// One candidate of a responsive source set.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SrcSetEntry {
    /// Candidate URL.
    pub url: String,
    /// Width (`600w`) or density (`2x`) descriptor.
    pub descriptor: String,
}

impl SrcSetEntry {
    /// Creates a source set entry.
    pub fn new(url: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// URLs produced by an [`AssetResolver`] for one image path.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Default `src`.
    pub primary: String,
    /// Ordered, non-empty source set.
    pub srcset: Vec<SrcSetEntry>,
}

impl ResolvedImage {
    /// Creates a resolved image from a primary URL and `(url, descriptor)` pairs.
    pub fn new<U, D>(primary: impl Into<String>, srcset: impl IntoIterator<Item = (U, D)>) -> Self
    where
        U: Into<String>,
        D: Into<String>,
    {
        Self {
            primary: primary.into(),
            srcset: srcset
                .into_iter()
                .map(|(url, descriptor)| SrcSetEntry::new(url, descriptor))
                .collect(),
        }
    }
}

/// Maps a decoded image path to concrete URLs.
pub trait AssetResolver: Send + Sync {
    /// Resolves `path` to a primary URL and a non-empty source set.
    fn resolve(&self, path: &str) -> Result<ResolvedImage, ResolveError>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Result<ResolvedImage, ResolveError> + Send + Sync,
{
    fn resolve(&self, path: &str) -> Result<ResolvedImage, ResolveError> {
        (self)(path)
    }
}

/// An `<img>` element ready to be written out.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    /// `class` attribute.
    pub class: String,
    /// Primary source.
    pub src: String,
    /// Responsive candidates, empty when the resolver failed.
    pub srcset: Vec<SrcSetEntry>,
    /// Accessible text.
    pub alt: String,
    /// Optional title carried over from the markdown node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImageElement {
    /// Formats the source set as an HTML `srcset` value.
    ///
    /// Candidate URLs are percent-encoded: `srcset` splits candidates on
    /// whitespace, so a raw space would cut the URL short.
    pub fn srcset_attr(&self) -> String {
        self.srcset
            .iter()
            .map(|entry| format!("{} {}", encode_uri(&entry.url), entry.descriptor))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Appends the element as HTML.
    pub fn write_html(&self, out: &mut String) {
        out.push_str(r#"<img class=""#);
        html_escape::encode_double_quoted_attribute_to_string(&self.class, out);
        out.push_str(r#"" src=""#);
        html_escape::encode_double_quoted_attribute_to_string(encode_uri(&self.src), out);
        out.push('"');

        if !self.srcset.is_empty() {
            out.push_str(r#" srcset=""#);
            html_escape::encode_double_quoted_attribute_to_string(self.srcset_attr(), out);
            out.push('"');
        }

        out.push_str(r#" alt=""#);
        html_escape::encode_double_quoted_attribute_to_string(&self.alt, out);
        out.push('"');

        if let Some(title) = &self.title {
            out.push_str(r#" title=""#);
            html_escape::encode_double_quoted_attribute_to_string(title, out);
            out.push('"');
        }

        out.push_str(" />");
    }
}

/// What an image node renders to.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ImageOutput {
    /// An `<img>` element (resolved, or plain when resolution failed).
    Image(ImageElement),
    /// Alt text only, used when the URI could not be decoded.
    AltText {
        /// Alt text of the node.
        alt: String,
    },
}

impl ImageOutput {
    /// Appends the output as HTML.
    pub fn write_html(&self, out: &mut String) {
        match self {
            ImageOutput::Image(element) => element.write_html(out),
            ImageOutput::AltText { alt } => {
                out.push_str(r#"<span class=""#);
                out.push_str(IMAGE_FALLBACK_CLASS);
                out.push_str(r#"">"#);
                html_escape::encode_text_to_string(alt, out);
                out.push_str("</span>");
            }
        }
    }
}

/// Result of rendering one image node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Output to emit in place of the node.
    pub output: ImageOutput,
    /// Node-local failure that forced a fallback.
    pub error: Option<NodeError>,
}

/// Renders an image node through `resolver`.
///
/// Never fails: a malformed URI falls back to the alt text, a resolver
/// failure falls back to a plain `<img>` pointing at the decoded path. The
/// cause is returned in [`RenderedImage::error`].
pub fn render_image(image: &Image, resolver: &dyn AssetResolver) -> RenderedImage {
    let decoded = match decode_uri(&image.url) {
        Ok(decoded) => decoded,
        Err(source) => {
            return RenderedImage {
                output: ImageOutput::AltText {
                    alt: image.alt.clone(),
                },
                error: Some(NodeError::Decode {
                    uri: image.url.clone(),
                    source,
                }),
            };
        }
    };

    let element = |src: String, srcset: Vec<SrcSetEntry>| ImageElement {
        class: IMAGE_CLASS.to_string(),
        src,
        srcset,
        alt: image.alt.clone(),
        title: image.title.clone(),
    };

    let resolved = resolver.resolve(&decoded).and_then(|resolved| {
        if resolved.srcset.is_empty() {
            Err(ResolveError::Invalid {
                path: decoded.to_string(),
                reason: "resolver returned an empty source set".to_string(),
            })
        } else {
            Ok(resolved)
        }
    });

    match resolved {
        Ok(resolved) => RenderedImage {
            output: ImageOutput::Image(element(resolved.primary, resolved.srcset)),
            error: None,
        },
        Err(err) => RenderedImage {
            output: ImageOutput::Image(element(decoded.into_owned(), Vec::new())),
            error: Some(err.into()),
        },
    }
}
