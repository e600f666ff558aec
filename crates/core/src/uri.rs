//! Percent-encoding for link destinations.
//!
//! Encoding keeps the characters a URI reference may legally contain
//! (the `encodeURI` set) and escapes everything else as UTF-8 `%XX`.
//! Escapes that are already well formed are copied through, so encoding
//! an encoded URI returns it unchanged.

use crate::error::DecodeError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode, utf8_percent_encode};
use std::borrow::Cow;

/// Characters escaped in a link destination.
pub const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Characters whose escapes survive [`decode_uri`].
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Returns true if `bytes[at]` starts a `%XX` escape.
fn is_escape_at(bytes: &[u8], at: usize) -> bool {
    bytes.get(at) == Some(&b'%')
        && bytes.get(at + 1).is_some_and(u8::is_ascii_hexdigit)
        && bytes.get(at + 2).is_some_and(u8::is_ascii_hexdigit)
}

/// Percent-encodes a URI, leaving valid `%XX` escapes untouched.
///
/// ```
/// use folio_core::uri::encode_uri;
///
/// assert_eq!(encode_uri("/my file.png"), "/my%20file.png");
/// assert_eq!(encode_uri("/my%20file.png"), "/my%20file.png");
/// ```
pub fn encode_uri(uri: &str) -> Cow<'_, str> {
    let bytes = uri.as_bytes();
    let mut out = String::with_capacity(uri.len());
    let mut segment_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if is_escape_at(bytes, i) {
            out.extend(utf8_percent_encode(&uri[segment_start..i], URI_ENCODE_SET));
            out.push_str(&uri[i..i + 3]);
            i += 3;
            segment_start = i;
        } else {
            i += 1;
        }
    }
    out.extend(utf8_percent_encode(&uri[segment_start..], URI_ENCODE_SET));

    if out == uri {
        Cow::Borrowed(uri)
    } else {
        Cow::Owned(out)
    }
}

/// Decodes a percent-encoded URI back to its original text.
///
/// Escapes of reserved characters (`;/?:@&=+$,#`) stay encoded, so
/// `/a%2Fb` is still one path segment after decoding.
///
/// Fails on a `%` that does not start a two-digit hex escape and on escapes
/// that decode to invalid UTF-8.
pub fn decode_uri(uri: &str) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = uri.as_bytes();
    if !bytes.contains(&b'%') {
        return Ok(Cow::Borrowed(uri));
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut segment_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        if !is_escape_at(bytes, i) {
            return Err(DecodeError::MalformedEscape { offset: i });
        }
        let reserved = u8::from_str_radix(&uri[i + 1..i + 3], 16)
            .is_ok_and(|byte| RESERVED.contains(&byte));
        if reserved {
            out.extend(percent_decode(&bytes[segment_start..i]));
            out.extend_from_slice(&bytes[i..i + 3]);
            segment_start = i + 3;
        }
        i += 3;
    }
    out.extend(percent_decode(&bytes[segment_start..]));

    if out == bytes {
        return Ok(Cow::Borrowed(uri));
    }
    String::from_utf8(out)
        .map(Cow::Owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}
