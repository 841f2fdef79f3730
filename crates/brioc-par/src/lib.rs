//! brioc-par - Recursive-descent parser for the Brio language.
//!
//! The parser consumes the token sequence produced by `brioc-lex` and
//! builds the source AST. The grammar, lowest precedence first:
//!
//! ```text
//! source      ::= field* method*
//! field       ::= 'LET' declaration
//! method      ::= 'DEF' IDENT '(' (param (',' param)*)? ')' (':' IDENT)?
//!                 'DO' stmt* 'END'
//! param       ::= IDENT (':' IDENT)?
//! stmt        ::= 'LET' declaration
//!               | 'IF' expr 'DO' stmt* ('ELSE' stmt*)? 'END'
//!               | 'FOR' IDENT 'IN' expr 'DO' stmt* 'END'
//!               | 'WHILE' expr 'DO' stmt* 'END'
//!               | 'RETURN' expr ';'
//!               | expr ('=' expr)? ';'
//! declaration ::= IDENT (':' IDENT)? ('=' expr)? ';'
//! logical     ::= equality (('AND'|'OR') equality)*
//! equality    ::= additive (('<'|'<='|'>'|'>='|'=='|'!=') additive)*
//! additive    ::= multiplicative (('+'|'-') multiplicative)*
//! multiplicative ::= secondary (('*'|'/') secondary)*
//! secondary   ::= primary ('.' IDENT ('(' args? ')')?)*
//! primary     ::= 'NIL' | 'TRUE' | 'FALSE' | INT | DEC | CHAR | STR
//!               | IDENT ('(' args? ')')?
//!               | '(' expr ')'
//! ```
//!
//! All binary operators are left-associative; each precedence level is
//! a loop over its operator set, never a recursion into itself.
//!
//! Token consumption goes through exactly two private helpers: `peek`,
//! which compares a window of upcoming tokens against [`Pat`] patterns,
//! and `take`, which advances the stream only when the whole window
//! matches. The first syntax error aborts with a positioned
//! [`ParseError`](brioc_util::ParseError).
//!
//! Literal decoding also happens here: escape sequences in character
//! and string literals are resolved, surrounding quotes stripped, and
//! numbers parsed into arbitrary-precision values.

pub mod ast;
mod expr;
mod items;
pub mod pattern;
mod stmt;

use brioc_lex::{Token, TokenKind};
use brioc_util::ParseError;

pub use ast::{
    Access, BinOp, Call, Declaration, Expr, ExprKind, Field, LiteralValue, Method, Source, Stmt,
    StmtKind,
};
pub use pattern::Pat;

/// Parses a token sequence into a [`Source`].
///
/// Convenience wrapper over [`Parser`].
pub fn parse(tokens: Vec<Token>) -> Result<Source, ParseError> {
    Parser::new(tokens).parse_source()
}

/// Recursive-descent parser over a token sequence.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Creates a parser over the given tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// True when every token has been consumed.
    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Lookahead predicate: does the upcoming token window match the
    /// given patterns, one token per pattern?
    fn peek(&self, patterns: &[Pat]) -> bool {
        patterns.iter().enumerate().all(|(offset, pattern)| {
            self.tokens
                .get(self.position + offset)
                .is_some_and(|token| pattern.matches(token))
        })
    }

    /// Matching consumer: advances past the window only if it matches.
    fn take(&mut self, patterns: &[Pat]) -> bool {
        if self.peek(patterns) {
            self.position += patterns.len();
            true
        } else {
            false
        }
    }

    /// Consumes one token matching `pattern`, or fails with a message
    /// naming `expected`.
    fn expect(&mut self, pattern: Pat, expected: &str) -> Result<Token, ParseError> {
        if self.peek(&[pattern]) {
            let token = self.tokens[self.position].clone();
            self.position += 1;
            Ok(token)
        } else {
            Err(self.error_here(format!("expected {}", expected)))
        }
    }

    /// Consumes an identifier token and returns its text.
    fn expect_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        self.expect(Pat::Kind(TokenKind::Identifier), expected)
            .map(|token| token.literal)
    }

    /// Byte offset of the next token, or of the end of input.
    fn next_index(&self) -> usize {
        match self.tokens.get(self.position) {
            Some(token) => token.index,
            None => self.tokens.last().map(|t| t.end()).unwrap_or(0),
        }
    }

    /// Builds a parse error positioned at the next token.
    fn error_here(&self, message: impl Into<String>) -> ParseError {
        let message = message.into();
        let message = match self.tokens.get(self.position) {
            Some(token) => format!("{}, found '{}'", message, token.literal),
            None => format!("{}, found end of input", message),
        };
        ParseError::new(message, self.next_index())
    }
}
