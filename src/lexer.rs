use memchr::{memchr, memchr_iter, memmem};

use crate::dialect::Dialect;
use crate::token::{Token, TokenKind};

/// The lexer turns a raw script into an ordered token sequence covering the
/// whole input with no gaps: concatenating every token's text reproduces the
/// source exactly. It never fails: unrecognized input degrades to `Other`
/// tokens so the splitter downstream can still make a best-effort decision.
pub struct Lexer<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> Lexer<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Tokenize `text` in a single left-to-right pass.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut pos = 0usize;
        let mut line = 1usize;
        let mut column = 1usize;

        while pos < text.len() {
            let rest = &text[pos..];
            let (len, kind) = self.scan_one(rest);
            debug_assert!(len > 0, "lexer must always make progress");
            let tok_text = &rest[..len];
            tokens.push(Token::new(kind, tok_text, line, column, pos));

            let newlines = memchr_iter(b'\n', tok_text.as_bytes()).count();
            if newlines > 0 {
                line += newlines;
                let after_last = &tok_text[tok_text.rfind('\n').unwrap() + 1..];
                column = after_last.chars().count() + 1;
            } else {
                column += tok_text.chars().count();
            }
            pos += len;
        }

        tokens
    }

    /// Match one token at the start of `rest`, trying candidates in fixed
    /// priority order: comments and quoted regions first (so keyword or
    /// terminator text inside them is never misclassified), then dialect
    /// scanners, words, terminator characters, whitespace, and finally a
    /// single-character catch-all.
    fn scan_one(&self, rest: &str) -> (usize, TokenKind) {
        let bytes = rest.as_bytes();
        let b0 = bytes[0];

        if bytes.starts_with(b"--") {
            return (scan_line_comment(bytes), TokenKind::CommentLine);
        }
        if bytes.starts_with(b"/*") {
            return (scan_block_comment(bytes), TokenKind::CommentBlock);
        }
        if b0 == b'\'' {
            return (scan_delimited(bytes, b'\''), TokenKind::StringLiteral);
        }
        for &(open, close) in self.dialect.identifier_quotes() {
            if b0 == open as u8 {
                return (
                    scan_delimited(bytes, close as u8),
                    TokenKind::QuotedIdentifier,
                );
            }
        }

        for scan in self.dialect.extra_scanners() {
            if let Some(len) = scan(rest) {
                return (len, TokenKind::StringLiteral);
            }
        }

        if is_word_start(b0) {
            let len = scan_word(bytes);
            let upper = rest[..len].to_ascii_uppercase();
            if self.dialect.batch_separators().contains(upper.as_str()) {
                return (len, TokenKind::BatchSeparator);
            }
            if self.dialect.block_starters().contains(upper.as_str())
                || self.dialect.block_enders().contains(upper.as_str())
            {
                return (len, TokenKind::Keyword);
            }
            return (len, TokenKind::Other);
        }

        let c = rest.chars().next().unwrap();
        if self.dialect.statement_terminators().contains(&c)
            || self.dialect.special_terminators().contains(&c)
        {
            return (c.len_utf8(), TokenKind::Terminator);
        }

        if c.is_whitespace() {
            return (scan_whitespace(rest), TokenKind::Whitespace);
        }

        (c.len_utf8(), TokenKind::Other)
    }
}

#[inline]
fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Scan a word (alphanumeric, underscore, or non-ASCII). Consuming whole
/// multi-byte sequences keeps every slice on a char boundary.
#[inline]
fn scan_word(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i < bytes.len() && is_word_start(bytes[i]) {
        i += 1;
    }
    i
}

/// Scan a `-- ...` comment up to, not including, the line break.
fn scan_line_comment(bytes: &[u8]) -> usize {
    match memchr(b'\n', bytes) {
        Some(at) if at > 0 && bytes[at - 1] == b'\r' => at - 1,
        Some(at) => at,
        None => bytes.len(),
    }
}

/// Scan a `/* ... */` comment; unterminated comments run to end of input.
fn scan_block_comment(bytes: &[u8]) -> usize {
    match memmem::find(&bytes[2..], b"*/") {
        Some(at) => 2 + at + 2,
        None => bytes.len(),
    }
}

/// Scan a quoted region with doubled-delimiter escaping (`''`, `""`, `]]`).
/// Returns the length including delimiters; unterminated regions run to end
/// of input.
fn scan_delimited(bytes: &[u8], close: u8) -> usize {
    let mut i = 1;
    while i < bytes.len() {
        match memchr(close, &bytes[i..]) {
            Some(at) => {
                let end = i + at;
                if bytes.get(end + 1) == Some(&close) {
                    i = end + 2;
                } else {
                    return end + 1;
                }
            }
            None => return bytes.len(),
        }
    }
    bytes.len()
}

fn scan_whitespace(rest: &str) -> usize {
    for (i, c) in rest.char_indices() {
        if !c.is_whitespace() {
            return i;
        }
    }
    rest.len()
}
