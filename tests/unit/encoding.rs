use partial_render::engine::lexer::{Lexer, TokenKind};
use partial_render::templating::{encode, strip_newlines};

use super::CORPUS;

/// Walk `encoded` the way a single-quoted literal is read and report the first
/// character that would end or corrupt it.
fn first_unsafe(encoded: &str) -> Option<(usize, char)> {
    let mut chars = encoded.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return Some((i, c));
                }
            }
            '\'' | '\n' => return Some((i, c)),
            _ => {}
        }
    }
    None
}

#[test]
fn test_encoded_text_has_no_unescaped_delimiters() {
    for raw in CORPUS {
        let encoded = encode(raw);
        assert_eq!(first_unsafe(&encoded), None, "unsafe character in encoding of {raw:?}");
        assert!(!encoded.contains('\n'), "newline survived encoding of {raw:?}");
    }
}

#[test]
fn test_encoded_literal_reads_back_as_one_string() {
    for raw in CORPUS {
        let script = format!("'{}'", encode(raw));
        let tokens = Lexer::new(&script).tokenize().unwrap();

        assert_eq!(tokens.len(), 2, "literal for {raw:?} split into several tokens");
        assert_eq!(tokens[0].kind, TokenKind::String(strip_newlines(raw)));
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }
}

#[test]
fn test_encoding_is_deterministic() {
    for raw in CORPUS {
        assert_eq!(encode(raw), encode(raw));
    }
}

#[test]
fn test_quote_and_backslash_are_escaped_in_place() {
    assert_eq!(encode("a'b\\c"), "a\\'b\\\\c");
}
