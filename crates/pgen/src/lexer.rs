use crate::span::Span;

pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

pub fn is_identifier(c: u8) -> bool {
    matches!(c, b'_' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9')
}

pub fn hex_to_num(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Cursor over grammar text.
///
/// Every `match_*` method either advances past what it matched or leaves the position untouched.
#[derive(Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        assert!(src.len() <= u32::MAX as usize, "Source is too large");
        Self { src, pos: 0 }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn pos(&self) -> u32 {
        self.pos
    }

    pub fn span_since(&self, start: u32) -> Span {
        Span::new(start, self.pos)
    }

    pub fn restore_pos(&mut self, pos: u32) {
        debug_assert!(pos as usize <= self.src.len());
        self.pos = pos;
    }

    pub fn is_empty(&self) -> bool {
        self.pos as usize >= self.src.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos as usize..]
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos as usize).copied()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    pub fn consume_while(&mut self, predicate: impl Fn(u8) -> bool) -> Span {
        let start = self.pos();
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.span_since(start)
    }

    pub fn skip_whitespace(&mut self) {
        self.consume_while(is_whitespace);
    }

    pub fn skip_horizontal_whitespace(&mut self) {
        self.consume_while(|c| c == b' ' || c == b'\t');
    }

    /// Skips everything up to and including the next newline.
    pub fn skip_line(&mut self) {
        let rest = self.rest().as_bytes();
        let len = match rest.iter().position(|&c| c == b'\n') {
            Some(newline) => newline + 1,
            None => rest.len(),
        };
        self.pos += len as u32;
    }

    pub fn match_newline(&mut self) -> bool {
        self.match_literal("\r\n") || self.match_literal("\n")
    }

    /// Two newlines, the line between them may hold spaces and tabs.
    pub fn match_blank_line(&mut self) -> bool {
        let start = self.pos();
        if self.match_newline() {
            self.skip_horizontal_whitespace();
            if self.match_newline() {
                return true;
            }
        }
        self.restore_pos(start);
        false
    }

    pub fn match_literal(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len() as u32;
            true
        } else {
            false
        }
    }

    pub fn match_identifier(&mut self) -> Option<&'a str> {
        let span = self.consume_while(is_identifier);
        match span.is_empty() {
            true => None,
            false => Some(span.as_str(self.src)),
        }
    }

    pub fn match_quoted_string(&mut self) -> Option<String> {
        let start = self.pos();
        let string = self.quoted_string();
        if string.is_none() {
            self.restore_pos(start);
        }
        string
    }

    fn quoted_string(&mut self) -> Option<String> {
        if !self.match_literal("\"") {
            return None;
        }

        let mut string = String::new();
        // start of the pending run of characters that need no unescaping
        let mut catchup = self.pos();

        loop {
            match self.peek()? {
                b'"' => {
                    string.push_str(self.span_since(catchup).as_str(self.src));
                    self.pos += 1;
                    return Some(string);
                }
                b'\\' => {
                    string.push_str(self.span_since(catchup).as_str(self.src));
                    self.pos += 1;

                    let escaped = self.peek_char()?;
                    self.pos += escaped.len_utf8() as u32;

                    match escaped {
                        'x' => {
                            let high = hex_to_num(self.next()?)?;
                            let low = hex_to_num(self.next()?)?;
                            string.push(char::from(high * 16 + low));
                        }
                        '"' | '\\' => string.push(escaped),
                        'a' => string.push('\x07'),
                        'b' => string.push('\x08'),
                        't' => string.push('\t'),
                        'n' => string.push('\n'),
                        'v' => string.push('\x0B'),
                        'f' => string.push('\x0C'),
                        'r' => string.push('\r'),
                        // the escaped character itself is dropped
                        _ => string.push('\\'),
                    }

                    catchup = self.pos();
                }
                _ => self.pos += 1,
            }
        }
    }
}

/// Inverse of [`Lexer::match_quoted_string`], without the surrounding quotes.
pub fn escape_string(str: &str) -> String {
    let mut escaped = String::with_capacity(str.len());
    for c in str.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\x07' => escaped.push_str("\\a"),
            '\x08' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\x0B' => escaped.push_str("\\v"),
            '\x0C' => escaped.push_str("\\f"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers() {
        for c in [b' ', b'\t', b'\r', b'\n'] {
            assert!(is_whitespace(c));
        }
        assert!(!is_whitespace(b'\x0C'));

        for c in [b'a', b'Z', b'0', b'9', b'_'] {
            assert!(is_identifier(c));
        }
        for c in [b'-', b'$', b'(', b' '] {
            assert!(!is_identifier(c));
        }

        assert_eq!(hex_to_num(b'7'), Some(7));
        assert_eq!(hex_to_num(b'b'), Some(11));
        assert_eq!(hex_to_num(b'F'), Some(15));
        assert_eq!(hex_to_num(b'g'), None);
    }

    #[test]
    fn test_newlines() {
        let mut l = Lexer::new("\r\n\nx");
        assert!(l.match_blank_line());
        assert_eq!(l.rest(), "x");

        let mut l = Lexer::new("\n \t\r\nx");
        assert!(l.match_blank_line());
        assert_eq!(l.rest(), "x");

        let mut l = Lexer::new("\n x");
        assert!(!l.match_blank_line());
        assert_eq!(l.pos(), 0);
        assert!(l.match_newline());
        assert!(!l.match_newline());
        assert_eq!(l.rest(), " x");

        // a lone carriage return is not a newline
        let mut l = Lexer::new("\rx");
        assert!(!l.match_newline());
        assert_eq!(l.pos(), 0);
    }

    #[test]
    fn test_identifier_and_literal() {
        let mut l = Lexer::new("rule_1: x");
        assert_eq!(l.match_identifier(), Some("rule_1"));
        assert_eq!(l.match_identifier(), None);
        assert!(!l.match_literal("::"));
        assert!(l.match_literal(":"));
        l.skip_whitespace();
        assert_eq!(l.match_identifier(), Some("x"));
        assert!(l.is_empty());
        assert_eq!(l.match_identifier(), None);
    }

    #[test]
    fn test_quoted_string() {
        let mut l = Lexer::new(r#""a\"b\\c\t\n\r\a\b\v\f" rest"#);
        assert_eq!(
            l.match_quoted_string().as_deref(),
            Some("a\"b\\c\t\n\r\x07\x08\x0B\x0C")
        );
        assert_eq!(l.rest(), " rest");

        let mut l = Lexer::new(r#""\x41\x7a""#);
        assert_eq!(l.match_quoted_string().as_deref(), Some("Az"));

        let mut l = Lexer::new(r#""é👍""#);
        assert_eq!(l.match_quoted_string().as_deref(), Some("é👍"));

        // unknown escapes produce a backslash and swallow the escaped character
        let mut l = Lexer::new(r#""a\qb""#);
        assert_eq!(l.match_quoted_string().as_deref(), Some("a\\b"));
    }

    #[test]
    fn test_quoted_string_failure_keeps_position() {
        for src in [r#""unterminated"#, r#""\x4"#, r#""\x4g""#, r#""trailing\"#, "x\"y\""] {
            let mut l = Lexer::new(src);
            assert_eq!(l.match_quoted_string(), None, "{src:?}");
            assert_eq!(l.pos(), 0, "{src:?}");
        }
    }

    #[test]
    fn test_escape_roundtrip() {
        let strings = [
            "",
            "plain",
            "quote\"d",
            "back\\slash",
            "\x07\x08\t\n\x0B\x0C\r",
            "mixed \"\\n\" 👍",
        ];

        for s in strings {
            let quoted = format!("\"{}\"", escape_string(s));
            let mut l = Lexer::new(&quoted);
            assert_eq!(l.match_quoted_string().as_deref(), Some(s));
            assert!(l.is_empty());
        }
    }

    #[test]
    fn test_skip_line() {
        let mut l = Lexer::new("# comment\r\nnext");
        l.skip_line();
        assert_eq!(l.rest(), "next");

        let mut l = Lexer::new("# no newline");
        l.skip_line();
        assert!(l.is_empty());

        let mut l = Lexer::new("# café ünïcode 👍\nnext");
        l.skip_line();
        assert_eq!(l.rest(), "next");

        let mut l = Lexer::new("# ends in é");
        l.skip_line();
        assert!(l.is_empty());
    }

    #[test]
    fn test_scanners_stop_at_multibyte_characters() {
        let mut l = Lexer::new("abcé");
        assert_eq!(l.match_identifier(), Some("abc"));
        assert_eq!(l.peek_char(), Some('é'));
        assert_eq!(l.rest(), "é");

        let mut l = Lexer::new(" \té\n");
        l.skip_whitespace();
        assert_eq!(l.rest(), "é\n");
        assert!(!l.match_newline());

        let mut l = Lexer::new(r#""\xé""#);
        assert_eq!(l.match_quoted_string(), None);
        assert_eq!(l.pos(), 0);
    }
}
