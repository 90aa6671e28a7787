use compact_str::CompactString;
use smallvec::SmallVec;

use crate::dialect::Dialect;
use crate::error::{Result, SplitError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Open-block stack. Scripts rarely nest more than a handful of levels.
type BlockStack = SmallVec<[CompactString; 8]>;

/// The statement splitter walks the token stream once, tracking procedural
/// block nesting, and cuts the script at every statement boundary.
///
/// It partitions text; it does not validate SQL. Malformed input (an
/// unterminated string, a `BEGIN` that is never closed) is handled as a
/// best-effort lexical decision, never as an error.
pub struct StatementSplitter<'d> {
    dialect: &'d dyn Dialect,
    strip_trailing_terminator: bool,
}

/// Ephemeral per-call accumulator. The statement in progress is tracked as a
/// start offset into the source, so finalizing a statement is one slice with
/// no per-token copying.
struct SplitState {
    start: usize,
    has_content: bool,
    blocks: BlockStack,
    statements: Vec<String>,
}

impl<'d> StatementSplitter<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            strip_trailing_terminator: false,
        }
    }

    /// Also strip one trailing terminator character from each statement.
    pub fn strip_trailing_terminator(mut self, strip: bool) -> Self {
        self.strip_trailing_terminator = strip;
        self
    }

    /// Split `script` into its individual statements, in order.
    pub fn split(&self, script: &str) -> Result<Vec<String>> {
        let tokens = Lexer::new(self.dialect).tokenize(script);
        let mut state = SplitState {
            start: 0,
            has_content: false,
            blocks: BlockStack::new(),
            statements: Vec::new(),
        };

        for (index, token) in tokens.iter().enumerate() {
            if token.kind.is_trivia() {
                continue;
            }
            state.has_content = true;

            if token.kind == TokenKind::Keyword {
                self.track_nesting(&tokens, index, &mut state)?;
            }

            if state.blocks.is_empty() && self.ends_statement(&tokens, index) {
                self.flush(script, token.end(), &mut state);
            }
        }

        // A script whose last statement has no trailing terminator still
        // yields that statement.
        self.flush(script, script.len(), &mut state);

        Ok(state.statements)
    }

    fn track_nesting(
        &self,
        tokens: &[Token<'_>],
        index: usize,
        state: &mut SplitState,
    ) -> Result<()> {
        let token = &tokens[index];
        let upper = token.text.to_ascii_uppercase();

        if self.dialect.block_starters().contains(upper.as_str()) {
            state.blocks.push(CompactString::from(upper));
            if state.blocks.len() > self.dialect.max_nesting_depth() {
                return Err(SplitError::NestingLimitExceeded {
                    max: self.dialect.max_nesting_depth(),
                    line: token.line,
                    column: token.column,
                });
            }
        } else if self.dialect.block_enders().contains(upper.as_str())
            && !state.blocks.is_empty()
            && self.dialect.is_real_block_ender(tokens, index)
        {
            state.blocks.pop();
        }

        Ok(())
    }

    /// Boundary test for a non-trivia token at depth zero.
    fn ends_statement(&self, tokens: &[Token<'_>], index: usize) -> bool {
        let token = &tokens[index];
        match token.kind {
            TokenKind::Terminator => {
                let Some(c) = token.text.chars().next() else {
                    return false;
                };
                if self.dialect.statement_terminators().contains(&c) {
                    !self.dialect.delays_semicolon(tokens, index)
                } else {
                    self.dialect.is_special_terminator(c, tokens, index)
                }
            }
            // A batch separator closes the statement it ends and is kept in
            // it, never carried into the next one.
            TokenKind::BatchSeparator => true,
            _ => false,
        }
    }

    /// Finalize the buffer up to `end`. Statements holding nothing but
    /// comments and whitespace are dropped, not emitted as empty strings.
    fn flush(&self, script: &str, end: usize, state: &mut SplitState) {
        let raw = &script[state.start..end];
        state.start = end;
        if !state.has_content {
            return;
        }
        state.has_content = false;

        let mut statement = raw.trim();
        if self.strip_trailing_terminator {
            if let Some(stripped) = statement
                .strip_suffix(|c| self.dialect.statement_terminators().contains(&c))
            {
                statement = stripped.trim_end();
            }
        }
        if !statement.is_empty() {
            state.statements.push(statement.to_string());
        }
    }
}
