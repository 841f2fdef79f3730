//! brioc-lex - Lexical analyzer for the Brio language.
//!
//! The lexer turns source text into a finite sequence of tokens:
//!
//! ```text
//! "LET x = 10;"  ->  [Identifier "LET", Identifier "x", Operator "=",
//!                     Integer "10", Operator ";"]
//! ```
//!
//! Token categories are deliberately coarse. Keywords are lexed as
//! plain identifiers; the parser tells `LET` apart from a variable
//! named `LET` by matching literal text. Every token records the exact
//! matched substring and the byte offset of its first character, and
//! the lexer fails fast: the first malformed literal aborts with a
//! positioned [`ParseError`](brioc_util::ParseError).
//!
//! Recognized forms:
//!
//! - Identifiers: `[A-Za-z_][A-Za-z0-9_-]*` (hyphens are legal).
//! - Numbers: optional sign directly followed by digits; a `.` only
//!   joins the number when at least one digit follows it.
//! - Character literals: `'c'` or `'\n'`, exactly one inner character.
//! - String literals: `"..."`, no raw newlines.
//! - Operators: `<= >= != ==` as two characters, anything else single.
//!
//! Escape alphabet inside character and string literals:
//! `\b \n \r \t \' \" \\`.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::{lex, Lexer};
pub use token::{Token, TokenKind};
