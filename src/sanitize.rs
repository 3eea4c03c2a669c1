//! Scalar rendering: JSON string escaping and the quoting decision.

use std::collections::HashSet;
use std::fmt;

use crate::types::{classify, JsType};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Escapes a raw scalar into the text placed between the quotes of a JSON
/// string.
pub trait Sanitizer: fmt::Debug {
    fn sanitize(&self, raw: &str) -> String;
}

/// Escapes with [`escape_json_str`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSanitizer;

impl Sanitizer for DefaultSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        escape_json_str(raw, &mut out);
        out
    }
}

/// Writes values classified as one of `literal_types` unquoted.
///
/// [`JsType::String`] is always quoted, even when listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeConverter {
    literal_types: HashSet<JsType>,
}

impl TypeConverter {
    pub fn new<I: IntoIterator<Item = JsType>>(types: I) -> Self {
        TypeConverter {
            literal_types: types.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.literal_types.is_empty()
    }

    /// Returns the unquoted literal for `raw`, or `None` when it must be
    /// written as a string.
    ///
    /// The literal is the trimmed value; the number, bool and null grammars
    /// only admit plain ASCII, so it needs no escaping.
    pub fn literal<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let trimmed = raw.trim();
        match classify(trimmed) {
            JsType::String => None,
            t if self.literal_types.contains(&t) => Some(trimmed),
            _ => None,
        }
    }
}

/// Escapes `s` for use inside a JSON string literal, appending to `out`.
///
/// Besides the mandatory escapes, `<`, `>`, `&`, U+2028 and U+2029 are written
/// as `\uXXXX` so the output stays safe inside HTML and JavaScript.
pub fn escape_json_str(s: &str, out: &mut String) {
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let escaped: Option<&str> = match c {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\n' => Some("\\n"),
            '\r' => Some("\\r"),
            '\t' => Some("\\t"),
            '\u{2028}' => Some("\\u2028"),
            '\u{2029}' => Some("\\u2029"),
            c if c < '\u{20}' || c == '<' || c == '>' || c == '&' => None,
            _ => continue,
        };
        out.push_str(&s[start..i]);
        match escaped {
            Some(e) => out.push_str(e),
            None => push_unicode_escape(bytes[i], out),
        }
        start = i + c.len_utf8();
    }
    out.push_str(&s[start..]);
}

/// Byte-oriented variant of [`escape_json_str`]: every byte that is not part
/// of a valid UTF-8 sequence becomes `\ufffd`.
///
/// [`Node`](crate::Node) text is always a `String`, so the encoder never sees
/// invalid UTF-8; this is for callers escaping raw bytes themselves.
pub fn escape_json_bytes(bytes: &[u8], out: &mut String) {
    for chunk in bytes.utf8_chunks() {
        escape_json_str(chunk.valid(), out);
        for _ in chunk.invalid() {
            out.push_str("\\ufffd");
        }
    }
}

fn push_unicode_escape(b: u8, out: &mut String) {
    out.push_str("\\u00");
    out.push(char::from(HEX[usize::from(b >> 4)]));
    out.push(char::from(HEX[usize::from(b & 0xF)]));
}
