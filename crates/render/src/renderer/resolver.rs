//! Built-in asset resolvers.

use super::image::{AssetResolver, ResolvedImage, SrcSetEntry};
use folio_core::ResolveError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Image CDN settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageOptions {
    /// URL prefix of images served by a resizing CDN.
    pub cdn_prefix: Option<String>,
    /// Widths offered in the source set.
    pub widths: Vec<u32>,
    /// Width of the primary `src`.
    pub default_width: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            cdn_prefix: Some("https://ucarecdn.com/".to_string()),
            widths: vec![300, 600, 1200, 1800],
            default_width: 1200,
        }
    }
}

/// Resolves CDN images to resize URLs and serves local paths as-is.
///
/// CDN URLs get one `-/resize/{w}x/` variant per configured width, in
/// ascending order; any other path resolves to itself with a `1x` entry.
#[derive(Debug, Clone)]
pub struct CdnImageResolver {
    options: ImageOptions,
    widths: Vec<u32>,
}

impl CdnImageResolver {
    /// Creates a resolver from image options.
    pub fn new(options: ImageOptions) -> Self {
        let mut widths = options.widths.clone();
        widths.sort_unstable();
        widths.dedup();
        Self { options, widths }
    }

    fn is_cdn(&self, path: &str) -> bool {
        self.options
            .cdn_prefix
            .as_deref()
            .is_some_and(|prefix| !prefix.is_empty() && path.starts_with(prefix))
    }

    fn resize_url(path: &str, width: u32) -> String {
        let separator = if path.ends_with('/') { "" } else { "/" };
        format!("{path}{separator}-/resize/{width}x/")
    }
}

impl Default for CdnImageResolver {
    fn default() -> Self {
        Self::new(ImageOptions::default())
    }
}

impl AssetResolver for CdnImageResolver {
    fn resolve(&self, path: &str) -> Result<ResolvedImage, ResolveError> {
        if path.trim().is_empty() {
            return Err(ResolveError::NotFound(path.to_string()));
        }

        if !self.is_cdn(path) {
            return Ok(ResolvedImage {
                primary: path.to_string(),
                srcset: vec![SrcSetEntry::new(path, "1x")],
            });
        }

        if self.widths.is_empty() {
            return Err(ResolveError::Invalid {
                path: path.to_string(),
                reason: "no image widths configured".to_string(),
            });
        }

        Ok(ResolvedImage {
            primary: Self::resize_url(path, self.options.default_width),
            srcset: self
                .widths
                .iter()
                .map(|width| SrcSetEntry::new(Self::resize_url(path, *width), format!("{width}w")))
                .collect(),
        })
    }
}

/// Resolves images from a fixed manifest of known assets.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    assets: HashMap<String, ResolvedImage>,
}

impl StaticResolver {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset to the manifest.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, image: ResolvedImage) -> Self {
        self.assets.insert(path.into(), image);
        self
    }
}

impl AssetResolver for StaticResolver {
    fn resolve(&self, path: &str) -> Result<ResolvedImage, ResolveError> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(path.to_string()))
    }
}
