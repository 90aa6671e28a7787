/// Byte offset into the source string.
pub type Pos = usize;

/// All token kinds produced by the script lexer.
///
/// The lexer is deliberately coarse: it only distinguishes the categories the
/// statement splitter needs to make boundary decisions. Everything else
/// (identifiers, numbers, operators, punctuation) lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `-- ...` up to (not including) the end of the line.
    CommentLine,
    /// `/* ... */`, possibly spanning multiple lines.
    CommentBlock,
    /// `'...'` with doubled-quote escaping, or a dialect string form such as
    /// a PostgreSQL dollar-quoted body.
    StringLiteral,
    /// `"..."` or a dialect bracket form such as T-SQL `[...]`.
    QuotedIdentifier,
    /// A block starter or block ender keyword (`BEGIN`, `END`, ...).
    Keyword,
    /// A statement terminator character (`;`, Oracle `/`).
    Terminator,
    /// A batch separator keyword (T-SQL `GO`).
    BatchSeparator,
    /// A run of whitespace characters.
    Whitespace,
    /// Any other word or single character.
    Other,
}

impl TokenKind {
    /// Trivia never affects nesting or termination decisions.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::CommentLine | Self::CommentBlock
        )
    }

    /// Kinds whose text is opaque to the splitter: keyword and terminator
    /// characters inside them never open blocks or end statements.
    pub fn is_quoted_region(self) -> bool {
        matches!(self, Self::StringLiteral | Self::QuotedIdentifier)
    }
}

/// An immutable token produced by the lexer.
///
/// `text` borrows the exact source substring, never normalized, so that
/// concatenating every token's text in order reproduces the input losslessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character.
    pub column: usize,
    /// 0-based byte offset of the first character.
    pub offset: Pos,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, line: usize, column: usize, offset: Pos) -> Self {
        Self {
            kind,
            text,
            line,
            column,
            offset,
        }
    }

    /// Byte offset one past the last character of this token.
    pub fn end(&self) -> Pos {
        self.offset + self.text.len()
    }
}

/// Walk forward from `index + 1` to the next token that is not trivia.
pub fn next_code_token<'t, 'a>(
    tokens: &'t [Token<'a>],
    index: usize,
) -> Option<&'t Token<'a>> {
    tokens[index + 1..].iter().find(|t| !t.kind.is_trivia())
}

/// Walk backward from `index - 1` to the previous token that is not trivia.
pub fn prev_code_token<'t, 'a>(
    tokens: &'t [Token<'a>],
    index: usize,
) -> Option<&'t Token<'a>> {
    tokens[..index].iter().rev().find(|t| !t.kind.is_trivia())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_classification() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::CommentLine.is_trivia());
        assert!(TokenKind::CommentBlock.is_trivia());
        assert!(!TokenKind::Keyword.is_trivia());
        assert!(!TokenKind::Terminator.is_trivia());
        assert!(!TokenKind::Other.is_trivia());
    }

    #[test]
    fn test_quoted_region_classification() {
        assert!(TokenKind::StringLiteral.is_quoted_region());
        assert!(TokenKind::QuotedIdentifier.is_quoted_region());
        assert!(!TokenKind::CommentBlock.is_quoted_region());
    }

    #[test]
    fn test_token_end() {
        let tok = Token::new(TokenKind::Other, "foo", 2, 5, 10);
        assert_eq!(tok.end(), 13);
    }

    #[test]
    fn test_code_token_navigation() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, "END", 1, 1, 0),
            Token::new(TokenKind::Whitespace, " ", 1, 4, 3),
            Token::new(TokenKind::CommentLine, "-- x", 1, 5, 4),
            Token::new(TokenKind::Terminator, ";", 1, 9, 8),
        ];
        assert_eq!(next_code_token(&tokens, 0).unwrap().text, ";");
        assert_eq!(prev_code_token(&tokens, 3).unwrap().text, "END");
        assert!(prev_code_token(&tokens, 0).is_none());
        assert!(next_code_token(&tokens, 3).is_none());
    }
}
