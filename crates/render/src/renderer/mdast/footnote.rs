//! GFM footnotes collected during a render.
//!
//! References are numbered in the order they first appear. Definitions are
//! rendered where the parser places them but emitted in a trailing section:
//! referenced notes first, in reference order, then notes nobody cites.

use std::collections::HashMap;

/// CSS class of the trailing footnote section.
pub const FOOTNOTES_CLASS: &str = "Content--Footnotes";

/// CSS class of the link back from a note to its reference.
pub const FOOTNOTE_BACKREF_CLASS: &str = "Content--Footnote-backref";

/// A numbered reference to a footnote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootnoteCall {
    /// Number shown to the reader.
    pub ordinal: usize,
    /// How many times the note was referenced so far, this one included.
    pub occurrence: usize,
}

/// Footnote references and definitions seen so far.
#[derive(Debug, Default)]
pub struct Footnotes {
    /// Referenced identifiers in first-reference order, with their counts.
    calls: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    /// Rendered bodies in definition order.
    definitions: Vec<(String, String)>,
}

fn push_attr(out: &mut String, value: &str) {
    html_escape::encode_double_quoted_attribute_to_string(value, out);
}

/// `id` of the n-th reference to a note.
fn reference_id(identifier: &str, occurrence: usize) -> String {
    if occurrence == 1 {
        format!("fnref-{identifier}")
    } else {
        format!("fnref-{identifier}-{occurrence}")
    }
}

impl Footnotes {
    /// Records a reference to `identifier`.
    pub fn call(&mut self, identifier: &str) -> FootnoteCall {
        match self.index.get(identifier).copied() {
            Some(slot) => {
                let count = &mut self.calls[slot].1;
                *count += 1;
                FootnoteCall {
                    ordinal: slot + 1,
                    occurrence: *count,
                }
            }
            None => {
                self.index.insert(identifier.to_string(), self.calls.len());
                self.calls.push((identifier.to_string(), 1));
                FootnoteCall {
                    ordinal: self.calls.len(),
                    occurrence: 1,
                }
            }
        }
    }

    /// Stores the rendered body of a definition. A repeated identifier
    /// keeps its first body.
    pub fn define(&mut self, identifier: &str, body: String) {
        if self.definitions.iter().all(|(id, _)| id != identifier) {
            self.definitions.push((identifier.to_string(), body));
        }
    }

    /// Returns true when no definition was collected.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Appends the reference as a superscript link to its note.
    pub fn write_call(identifier: &str, call: FootnoteCall, out: &mut String) {
        out.push_str(r##"<sup><a href="#fn-"##);
        push_attr(out, identifier);
        out.push_str(r#"" id=""#);
        push_attr(out, &reference_id(identifier, call.occurrence));
        out.push_str(r#"">"#);
        out.push_str(&call.ordinal.to_string());
        out.push_str("</a></sup>");
    }

    /// Appends the footnote section. Writes nothing without definitions.
    pub fn write_section(&self, out: &mut String) {
        if self.is_empty() {
            return;
        }

        let cited = self
            .calls
            .iter()
            .filter_map(|(id, count)| self.body(id).map(|body| (id.as_str(), body, *count)));
        let uncited = self
            .definitions
            .iter()
            .filter(|(id, _)| !self.index.contains_key(id))
            .map(|(id, body)| (id.as_str(), body.as_str(), 0));

        out.push_str(r#"<section class=""#);
        out.push_str(FOOTNOTES_CLASS);
        out.push_str(r#""><ol>"#);
        for (identifier, body, count) in cited.chain(uncited) {
            out.push_str(r#"<li id="fn-"#);
            push_attr(out, identifier);
            out.push_str(r#"">"#);
            out.push_str(body);
            for occurrence in 1..=count {
                out.push_str(r##"<a href="#"##);
                push_attr(out, &reference_id(identifier, occurrence));
                out.push_str(r#"" class=""#);
                out.push_str(FOOTNOTE_BACKREF_CLASS);
                out.push_str(r#"">↩</a>"#);
            }
            out.push_str("</li>");
        }
        out.push_str("</ol></section>");
    }

    fn body(&self, identifier: &str) -> Option<&str> {
        self.definitions
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, body)| body.as_str())
    }
}
