//! Code block highlighting.
//!
//! Every code block is highlighted with one configured language and theme.
//! The fence's own info string does not participate.

use markdown::mdast::Code;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

/// Language applied to every code block unless configured otherwise.
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// Theme applied to every code block unless configured otherwise.
pub const DEFAULT_CODE_THEME: &str = "InspiredGitHub";

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Language and theme used for code blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeStyle {
    /// Language token handed to the highlighter.
    pub language: String,
    /// Theme name handed to the highlighter.
    pub theme: String,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            language: DEFAULT_CODE_LANGUAGE.to_string(),
            theme: DEFAULT_CODE_THEME.to_string(),
        }
    }
}

/// Turns source code into highlighted HTML.
///
/// Implementations must be total: unknown languages or themes degrade to
/// plain escaped output instead of failing.
pub trait Highlighter: Send + Sync {
    /// Highlights `code` as `language` using `theme`.
    fn highlight(&self, code: &str, language: &str, theme: &str) -> String;
}

/// A highlighted code block.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    /// Original code text.
    pub code: String,
    /// Language it was highlighted as.
    pub language: String,
    /// Theme it was highlighted with.
    pub theme: String,
    /// Highlighter output.
    pub html: String,
}

/// Renders a code node with the configured style.
pub fn render_code(code: &Code, highlighter: &dyn Highlighter, style: &CodeStyle) -> HighlightedCode {
    HighlightedCode {
        code: code.value.clone(),
        language: style.language.clone(),
        theme: style.theme.clone(),
        html: highlighter.highlight(&code.value, &style.language, &style.theme),
    }
}

/// Appends `code` as an escaped `<pre><code>` block.
pub fn write_plain_code(code: &str, out: &mut String) {
    out.push_str("<pre><code>");
    html_escape::encode_text_to_string(code, out);
    out.push_str("</code></pre>");
}

/// Highlighter backed by syntect's bundled syntaxes and themes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
    /// Creates a highlighter. Syntax and theme sets load on first use.
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str, theme: &str) -> String {
        let syntax = SYNTAX_SET
            .find_syntax_by_token(language)
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let theme = match THEME_SET.themes.get(theme) {
            Some(found) => found,
            None => match THEME_SET.themes.get(DEFAULT_CODE_THEME) {
                Some(fallback) => {
                    log::warn!(
                        "Unknown highlight theme '{}', using '{}'",
                        theme,
                        DEFAULT_CODE_THEME
                    );
                    fallback
                }
                None => {
                    log::warn!("No highlight theme available, emitting plain code");
                    let mut out = String::new();
                    write_plain_code(code, &mut out);
                    return out;
                }
            },
        };

        match syntect::html::highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme) {
            Ok(html) => html,
            Err(err) => {
                log::warn!("Syntax highlighting failed, emitting plain code: {}", err);
                let mut out = String::new();
                write_plain_code(code, &mut out);
                out
            }
        }
    }
}

/// Highlighter that escapes code without colouring it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language: &str, _theme: &str) -> String {
        let mut out = String::new();
        write_plain_code(code, &mut out);
        out
    }
}
