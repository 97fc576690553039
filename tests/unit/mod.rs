//! Unit test suite for partial-render
//!
//! Property-style checks of the pure pipeline stages, run over a shared corpus
//! of awkward inputs rather than one example at a time.
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! - **encoding**: literal encoding stays inert and decodes back to the flattened input
//! - **discovery**: scanning, resolution and assembly of partial references

mod discovery;
mod encoding;

/// Inputs that have broken naive literal encoders.
pub const CORPUS: &[&str] = &[
    "",
    "plain text",
    "it's",
    "\\",
    "\\'",
    "'\\",
    "ends with backslash \\",
    "'); alert(1); ('",
    "\"double\" and 'single'",
    "line one\nline two\n",
    "windows\r\nline endings\r\n",
    "tab\tseparated",
    "nul \u{0} and bell \u{7}",
    "\u{2028}\u{2029} separators",
    "accents: é ü ñ",
    "emoji 😀 and astral 𝄞",
    "{{> header}}Body{{> footer_links}}",
    "<script>var s = '</script>';</script>",
    "/* not a comment */ // nor this",
];
