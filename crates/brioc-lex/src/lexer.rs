//! The lexer proper: dispatch on the first character of each token.

use brioc_util::ParseError;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexes an entire source text into tokens.
///
/// Convenience wrapper over [`Lexer`].
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).lex()
}

/// Lexer for Brio source text.
///
/// Maintains a [`Cursor`] and the start offset of the token being
/// built. Whitespace (any Unicode whitespace) separates tokens and is
/// never emitted.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
        }
    }

    /// Consumes the lexer, producing the full token sequence.
    pub fn lex(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Produces the next token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace();
        self.token_start = self.cursor.position();

        if self.cursor.is_at_end() {
            return Ok(None);
        }

        let kind = match self.cursor.current_char() {
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            '+' | '-' if self.cursor.peek_char(1).is_ascii_digit() => self.lex_number(),
            '\'' => self.lex_character()?,
            '"' => self.lex_string()?,
            _ => self.lex_operator(),
        };

        Ok(Some(self.emit(kind)))
    }

    /// Builds the token for the slice consumed since `token_start`.
    fn emit(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.cursor.slice_from(self.token_start), self.token_start)
    }

    fn skip_whitespace(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char().is_whitespace() {
            self.cursor.advance();
        }
    }

    /// `[A-Za-z_][A-Za-z0-9_-]*`, keywords included.
    fn lex_identifier(&mut self) -> TokenKind {
        self.cursor.advance();
        while matches!(self.cursor.current_char(), c if c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            self.cursor.advance();
        }
        TokenKind::Identifier
    }

    /// Optionally signed digits, extended to a decimal only when a `.`
    /// is directly followed by another digit.
    fn lex_number(&mut self) -> TokenKind {
        if matches!(self.cursor.current_char(), '+' | '-') {
            self.cursor.advance();
        }
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        }
    }

    /// `'c'`: exactly one inner character, plain or escaped.
    fn lex_character(&mut self) -> Result<TokenKind, ParseError> {
        self.cursor.advance();

        match self.cursor.current_char() {
            '\0' if self.cursor.is_at_end() => {
                return Err(self.unterminated("character"));
            }
            '\'' => {
                return Err(ParseError::new("empty character literal", self.token_start));
            }
            '\n' | '\r' => {
                return Err(self.unterminated("character"));
            }
            '\\' => {
                self.cursor.advance();
                self.take_escape()?;
            }
            _ => self.cursor.advance(),
        }

        if self.cursor.current_char() != '\'' {
            return Err(self.unterminated("character"));
        }
        self.cursor.advance();
        Ok(TokenKind::Character)
    }

    /// `"..."`: escapes allowed, raw newlines not.
    fn lex_string(&mut self) -> Result<TokenKind, ParseError> {
        self.cursor.advance();

        loop {
            if self.cursor.is_at_end() {
                return Err(self.unterminated("string"));
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return Ok(TokenKind::Str);
                }
                '\n' | '\r' => {
                    return Err(self.unterminated("string"));
                }
                '\\' => {
                    self.cursor.advance();
                    self.take_escape()?;
                }
                _ => self.cursor.advance(),
            }
        }
    }

    /// Validates and consumes the character after a backslash.
    ///
    /// The escape alphabet is `\b \n \r \t \' \" \\`.
    fn take_escape(&mut self) -> Result<(), ParseError> {
        let backslash = self.cursor.position() - 1;
        if self.cursor.is_at_end() {
            return Err(ParseError::new("unterminated escape sequence", backslash));
        }
        match self.cursor.current_char() {
            'b' | 'n' | 'r' | 't' | '\'' | '"' | '\\' => {
                self.cursor.advance();
                Ok(())
            }
            c => Err(ParseError::new(
                format!("invalid escape sequence '\\{}'", c),
                backslash,
            )),
        }
    }

    /// `< > ! =` optionally followed by `=`, or any single character.
    fn lex_operator(&mut self) -> TokenKind {
        let c = self.cursor.current_char();
        self.cursor.advance();
        if matches!(c, '<' | '>' | '!' | '=') && self.cursor.current_char() == '=' {
            self.cursor.advance();
        }
        TokenKind::Operator
    }

    fn unterminated(&self, what: &str) -> ParseError {
        ParseError::new(format!("unterminated {} literal", what), self.token_start)
    }
}
