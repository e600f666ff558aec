//! Link destination normalization.
//!
//! Scans raw markdown for inline link and image constructs
//! (`[label](destination "title")`) and percent-encodes the destination so
//! paths such as `/my file.png` survive parsing. Labels, titles, delimiters
//! and all other text are copied unchanged.
//!
//! Nested groups are paired with explicit stacks in one pass over the text,
//! never by recursion: the label may contain balanced `[...]` groups and the
//! destination balanced `(...)` groups, so `[a [b] c](http://e.com/(p)(q))`
//! is matched as one link.

use crate::uri::encode_uri;
use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;

/// One link construct found in the source. All ranges are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    /// Whole construct, from `[` through the closing `)`.
    pub span: Range<usize>,
    /// Label text between the outer brackets.
    pub label: Range<usize>,
    /// Destination URI, without surrounding blanks or `<` `>`.
    pub destination: Range<usize>,
    /// Quoted title including its quotes.
    pub title: Option<Range<usize>>,
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn skip_blanks(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).copied().is_some_and(is_blank) {
        i += 1;
    }
    i
}

/// Pairs every `[` with the `]` that brings its depth back to zero.
///
/// A backslash escapes the following byte. Labels may span lines.
fn pair_brackets(bytes: &[u8]) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' => i += 1,
            b'[' => open.push(i),
            b']' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    pairs
}

/// Pairs every `(` with its closing `)` on the same line.
fn pair_parens(bytes: &[u8]) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\n' | b'\r' => open.clear(),
            b'(' => open.push(i),
            b')' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, i);
                }
            }
            _ => {}
        }
    }
    pairs
}

/// Last closing-quote search for one quote character.
///
/// Searching from any offset in `from..until` yields `close`.
#[derive(Debug, Default, Clone, Copy)]
struct TitleMemo {
    from: usize,
    until: usize,
    close: Option<usize>,
}

struct Scanner<'s> {
    bytes: &'s [u8],
    labels: HashMap<usize, usize>,
    groups: HashMap<usize, usize>,
    titles: [TitleMemo; 2],
}

impl<'s> Scanner<'s> {
    fn new(bytes: &'s [u8]) -> Self {
        Self {
            bytes,
            labels: pair_brackets(bytes),
            groups: pair_parens(bytes),
            titles: [TitleMemo::default(); 2],
        }
    }

    /// Finds the first `quote` at or after `from` that is followed by blanks
    /// and `)`, without crossing a line break.
    fn title_close(&mut self, quote: u8, from: usize) -> Option<usize> {
        let slot = usize::from(quote == b'\'');
        let memo = self.titles[slot];
        if memo.from <= from && from < memo.until {
            return memo.close;
        }

        let mut j = from;
        let close = loop {
            match self.bytes.get(j).copied() {
                None | Some(b'\n' | b'\r') => break None,
                Some(b) if b == quote
                    && self.bytes.get(skip_blanks(self.bytes, j + 1)) == Some(&b')') =>
                {
                    break Some(j);
                }
                _ => j += 1,
            }
        };
        self.titles[slot] = TitleMemo {
            from,
            until: j,
            close,
        };
        close
    }

    /// Matches `<blanks>? <title>? <blanks>? )` at `at`.
    ///
    /// Returns the title range (quotes included) and the index after `)`.
    fn match_tail(&mut self, at: usize) -> Option<(Option<Range<usize>>, usize)> {
        let i = skip_blanks(self.bytes, at);
        match *self.bytes.get(i)? {
            b')' => Some((None, i + 1)),
            quote @ (b'"' | b'\'') => {
                let close = self.title_close(quote, i + 1)?;
                let after = skip_blanks(self.bytes, close + 1);
                Some((Some(i..close + 1), after + 1))
            }
            _ => None,
        }
    }

    /// Scans a destination starting at `start` (after optional blanks and `<`).
    ///
    /// Returns the raw destination range, the optional title and the index
    /// after the closing `)`. The opening parenthesis must be balanced on its
    /// line, so destinations never span lines.
    fn scan_destination(
        &mut self,
        open: usize,
        start: usize,
    ) -> Option<(Range<usize>, Option<Range<usize>>, usize)> {
        let close = *self.groups.get(&open)?;
        let mut depth = 0usize;
        let mut i = start;
        while i < close {
            match self.bytes[i] {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b' ' | b'\t' if depth == 0 => {
                    if let Some((title, end)) = self.match_tail(i) {
                        return Some((start..i, title, end));
                    }
                    // Every blank of a run leads to the same tail.
                    i = skip_blanks(self.bytes, i);
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        Some((start..close, None, close + 1))
    }

    /// Tries to match a complete link construct whose label opens at `start`.
    fn match_link(&mut self, start: usize) -> Option<LinkSpan> {
        let label_end = *self.labels.get(&start)?;
        let open = label_end + 1;
        if self.bytes.get(open) != Some(&b'(') {
            return None;
        }

        let mut dest_start = skip_blanks(self.bytes, open + 1);
        if self.bytes.get(dest_start) == Some(&b'<') {
            dest_start += 1;
        }

        let (mut destination, title, end) = self.scan_destination(open, dest_start)?;
        if destination.end > destination.start && self.bytes[destination.end - 1] == b'>' {
            destination.end -= 1;
        }

        Some(LinkSpan {
            span: start..end,
            label: start + 1..label_end,
            destination,
            title,
        })
    }
}

/// Finds every link construct in `source`, left to right, without overlap.
///
/// Runs in time linear in the length of `source`: bracket and parenthesis
/// pairs are computed once up front.
pub fn find_link_spans(source: &str) -> Vec<LinkSpan> {
    let bytes = source.as_bytes();
    let mut scanner = Scanner::new(bytes);
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(rel) = bytes[pos..].iter().position(|b| *b == b'[') {
        let start = pos + rel;
        match scanner.match_link(start) {
            Some(link) => {
                pos = link.span.end;
                spans.push(link);
            }
            None => pos = start + 1,
        }
    }

    spans
}

/// Percent-encodes the destination of every link construct in `source`.
///
/// Text without links is returned borrowed. Malformed link-like text is left
/// untouched; this function never fails.
///
/// The scan does not know about code: link-shaped text inside inline code or
/// fenced blocks is rewritten too, so `` `[x](a b)` `` becomes
/// `` `[x](a%20b)` ``.
///
/// ```
/// use folio_core::links::encode_link_destinations;
///
/// assert_eq!(encode_link_destinations("[x](/my file.png)"), "[x](/my%20file.png)");
/// assert_eq!(encode_link_destinations("plain (text)"), "plain (text)");
/// ```
pub fn encode_link_destinations(source: &str) -> Cow<'_, str> {
    let mut output: Option<String> = None;
    let mut copied_to = 0;

    for link in find_link_spans(source) {
        if link.destination.is_empty() {
            continue;
        }
        let uri = &source[link.destination.clone()];
        if let Cow::Owned(encoded) = encode_uri(uri) {
            let out = output.get_or_insert_with(|| String::with_capacity(source.len() + 16));
            out.push_str(&source[copied_to..link.destination.start]);
            out.push_str(&encoded);
            copied_to = link.destination.end;
        }
    }

    match output {
        Some(mut out) => {
            out.push_str(&source[copied_to..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(source),
    }
}
