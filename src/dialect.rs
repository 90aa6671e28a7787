use memchr::memmem;
use phf::phf_set;

use crate::error::SplitError;
use crate::token::{next_code_token, prev_code_token, Token, TokenKind};

/// A dialect-specific scanner tried before the generic string and identifier
/// patterns. Given the remaining input, returns the byte length of one
/// string-literal token starting at offset 0, or `None` to fall through.
pub type Scanner = fn(&str) -> Option<usize>;

/// Default ceiling on simultaneously open procedural blocks.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

static NO_KEYWORDS: phf::Set<&'static str> = phf_set! {};

/// A SQL dialect describes the lexical quirks the splitter must honor:
/// which keywords open and close procedural blocks, which characters end a
/// statement, and the odd per-engine terminators (Oracle's `/`, T-SQL's `GO`).
///
/// Implementations are pure data plus pure predicates. They hold no mutable
/// state and are safe to share across concurrent split calls.
pub trait Dialect: Send + Sync {
    /// Identifier used for registry dispatch, e.g. `"oracle"`.
    fn name(&self) -> &'static str;

    /// Keywords that open a procedural block, upper-cased.
    fn block_starters(&self) -> &'static phf::Set<&'static str>;

    /// Keywords that close a procedural block, upper-cased.
    fn block_enders(&self) -> &'static phf::Set<&'static str>;

    /// Characters that normally end a statement.
    fn statement_terminators(&self) -> &'static [char] {
        &[';']
    }

    /// Keywords that always end the current statement when matched as a
    /// whole token (T-SQL `GO`), upper-cased.
    fn batch_separators(&self) -> &'static phf::Set<&'static str> {
        &NO_KEYWORDS
    }

    /// Characters that end a statement only when `is_special_terminator`
    /// confirms the structural condition (Oracle `/`).
    fn special_terminators(&self) -> &'static [char] {
        &[]
    }

    /// Whether the special terminator `c` at `tokens[index]` really ends the
    /// statement there.
    fn is_special_terminator(&self, _c: char, _tokens: &[Token<'_>], _index: usize) -> bool {
        false
    }

    /// Quoted-identifier delimiter pairs. T-SQL adds `[...]`.
    fn identifier_quotes(&self) -> &'static [(char, char)] {
        &[('"', '"')]
    }

    /// Ceiling on simultaneously open blocks.
    fn max_nesting_depth(&self) -> usize {
        DEFAULT_MAX_NESTING_DEPTH
    }

    /// Dialect-specific scanners tried before the generic string and
    /// identifier patterns (PostgreSQL dollar quoting).
    fn extra_scanners(&self) -> &'static [Scanner] {
        &[]
    }

    /// Whether the block-ender keyword at `tokens[index]` closes a tracked
    /// block. Oracle's `END IF` / `END LOOP` / `END CASE` / `END WHILE`
    /// close a control structure instead and leave the stack alone.
    fn is_real_block_ender(&self, _tokens: &[Token<'_>], _index: usize) -> bool {
        true
    }

    /// Whether the `;` at `tokens[index]` should be ignored as a boundary.
    /// Any dialect with batch separators delays every semicolon: only the
    /// batch separator terminates.
    fn delays_semicolon(&self, _tokens: &[Token<'_>], _index: usize) -> bool {
        !self.batch_separators().is_empty()
    }
}

// ---- Oracle (PL/SQL) ----

static ORACLE_BLOCK_STARTERS: phf::Set<&'static str> = phf_set! {"BEGIN", "DECLARE", "CASE"};
static ORACLE_BLOCK_ENDERS: phf::Set<&'static str> = phf_set! {"END"};

/// Words that close a control structure after `END`, not a `BEGIN` block.
const CONTROL_STRUCTURE_WORDS: [&str; 4] = ["IF", "LOOP", "CASE", "WHILE"];

pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn block_starters(&self) -> &'static phf::Set<&'static str> {
        &ORACLE_BLOCK_STARTERS
    }

    fn block_enders(&self) -> &'static phf::Set<&'static str> {
        &ORACLE_BLOCK_ENDERS
    }

    fn special_terminators(&self) -> &'static [char] {
        &['/']
    }

    /// A `/` only runs the buffered statement when nothing but whitespace
    /// and line comments share its source line (sqlplus rules).
    fn is_special_terminator(&self, c: char, tokens: &[Token<'_>], index: usize) -> bool {
        c == '/' && slash_is_alone_on_line(tokens, index)
    }

    fn is_real_block_ender(&self, tokens: &[Token<'_>], index: usize) -> bool {
        match next_code_token(tokens, index) {
            Some(next) => !CONTROL_STRUCTURE_WORDS
                .iter()
                .any(|w| next.text.eq_ignore_ascii_case(w)),
            None => true,
        }
    }

    /// After `END;` the client-side terminator is the upcoming `/`, if the
    /// script has one: the semicolon belongs to the block, not the script.
    fn delays_semicolon(&self, tokens: &[Token<'_>], index: usize) -> bool {
        let follows_end = matches!(
            prev_code_token(tokens, index),
            Some(prev) if prev.kind == TokenKind::Keyword && prev.text.eq_ignore_ascii_case("END")
        );
        follows_end
            && tokens[index + 1..]
                .iter()
                .any(|t| t.kind == TokenKind::Terminator && t.text == "/")
    }
}

/// True when every token sharing the slash's source line, on either side of
/// it, is whitespace or a line comment.
fn slash_is_alone_on_line(tokens: &[Token<'_>], index: usize) -> bool {
    let line = tokens[index].line;

    // Tokens tile the input, so walking backward the first token starting on
    // an earlier line is the one containing this line's leading newline. If
    // that is not plain whitespace, the line begins mid-token.
    for tok in tokens[..index].iter().rev() {
        if tok.line < line {
            return tok.kind == TokenKind::Whitespace;
        }
        if !matches!(tok.kind, TokenKind::Whitespace | TokenKind::CommentLine) {
            return false;
        }
    }

    for tok in &tokens[index + 1..] {
        if tok.line > line {
            break;
        }
        if !matches!(tok.kind, TokenKind::Whitespace | TokenKind::CommentLine) {
            return false;
        }
    }

    true
}

// ---- T-SQL ----

static TSQL_BLOCK_STARTERS: phf::Set<&'static str> = phf_set! {"BEGIN", "TRY"};
static TSQL_BLOCK_ENDERS: phf::Set<&'static str> = phf_set! {"END", "CATCH"};
static TSQL_BATCH_SEPARATORS: phf::Set<&'static str> = phf_set! {"GO"};

pub struct TSql;

impl Dialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn block_starters(&self) -> &'static phf::Set<&'static str> {
        &TSQL_BLOCK_STARTERS
    }

    fn block_enders(&self) -> &'static phf::Set<&'static str> {
        &TSQL_BLOCK_ENDERS
    }

    fn batch_separators(&self) -> &'static phf::Set<&'static str> {
        &TSQL_BATCH_SEPARATORS
    }

    fn identifier_quotes(&self) -> &'static [(char, char)] {
        &[('"', '"'), ('[', ']')]
    }
}

// ---- PostgreSQL ----

static POSTGRES_BLOCK_STARTERS: phf::Set<&'static str> =
    phf_set! {"BEGIN", "DECLARE", "CASE", "DO"};
static POSTGRES_BLOCK_ENDERS: phf::Set<&'static str> = phf_set! {"END"};

static POSTGRES_SCANNERS: [Scanner; 1] = [scan_dollar_quoted];

pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn block_starters(&self) -> &'static phf::Set<&'static str> {
        &POSTGRES_BLOCK_STARTERS
    }

    fn block_enders(&self) -> &'static phf::Set<&'static str> {
        &POSTGRES_BLOCK_ENDERS
    }

    fn extra_scanners(&self) -> &'static [Scanner] {
        &POSTGRES_SCANNERS
    }
}

/// Scan a dollar-quoted string: `$tag$ ... $tag$`, tag included. The body is
/// opaque, so keywords and semicolons inside it never reach the splitter.
/// Returns `None` when the closing tag is missing, letting the `$` fall
/// through to the generic matchers.
fn scan_dollar_quoted(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'$') {
        return None;
    }
    // The tag is empty or identifier-like; `$1` and friends are parameters.
    if bytes.get(1).is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut tag_end = 1;
    while tag_end < bytes.len()
        && (bytes[tag_end].is_ascii_alphanumeric() || bytes[tag_end] == b'_')
    {
        tag_end += 1;
    }
    if bytes.get(tag_end) != Some(&b'$') {
        return None;
    }
    let tag = &bytes[..tag_end + 1];
    memmem::find(&bytes[tag.len()..], tag).map(|at| tag.len() + at + tag.len())
}

// ---- Registry ----

/// Resolve a dialect by name. Names are matched lower-cased; the aliases the
/// driver layer uses ("postgresql", "mssql") resolve to the same capability.
pub fn dialect_from_name(name: &str) -> Result<Box<dyn Dialect>, SplitError> {
    match name.to_ascii_lowercase().as_str() {
        "oracle" => Ok(Box::new(Oracle)),
        "tsql" | "mssql" => Ok(Box::new(TSql)),
        "postgres" | "postgresql" => Ok(Box::new(Postgres)),
        _ => Err(SplitError::UnsupportedDialect(name.to_string())),
    }
}
