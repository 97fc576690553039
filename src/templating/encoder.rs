//! Safe literal encoding for the invocation syntax.
//!
//! Every piece of caller-controlled text (template, partial content, data) is
//! spliced into the invocation inside a single-quoted string literal. The
//! functions here make that text inert: after encoding, nothing in it can close
//! the literal or change what the surrounding call means.
//!
//! Encoding happens in two steps:
//!
//! 1. [`strip_newlines`] flattens multi-line source to one line by deleting every
//!    `\n` (carriage returns are kept and escaped)
//! 2. [`escape_literal`] escapes quotes, backslashes, control characters and every
//!    non-ASCII character
//!
//! Characters of the partial-name class (`[A-Za-z0-9_./]`) and the marker
//! punctuation (`{`, `}`, `>`, space) pass through untouched, so partial markers
//! survive encoding verbatim.

/// Remove every newline character from `raw`.
#[must_use]
pub fn strip_newlines(raw: &str) -> String {
    raw.replace('\n', "")
}

/// Escape `raw` for embedding inside a single-quoted string literal.
///
/// | input | output |
/// |---|---|
/// | `'` `"` `\` | `\'` `\"` `\\` |
/// | backspace, tab, form feed, newline, carriage return | `\b` `\t` `\f` `\n` `\r` |
/// | other characters below U+0020 | `\u00XX` |
/// | DEL and everything above | `\uXXXX`, UTF-16 surrogate pairs for astral characters |
///
/// The output is pure printable ASCII.
#[must_use]
pub fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);

    for ch in raw.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || (c as u32) >= 0x7f => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }

    out
}

/// Flatten and escape `raw` in one step.
///
/// This is the only way template and partial content enter an invocation.
#[must_use]
pub fn encode(raw: &str) -> String {
    escape_literal(&strip_newlines(raw))
}

/// Render `name` as a key of an object literal.
///
/// Names that are valid bare identifiers are written as-is. Others, such as
/// `blog/post.card` or names starting with a digit, are quoted.
#[must_use]
pub fn literal_key(name: &str) -> String {
    let mut chars = name.chars();
    let bare = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if bare {
        name.to_string()
    } else {
        format!("'{}'", escape_literal(name))
    }
}
