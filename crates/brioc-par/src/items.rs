//! Top-level parsing: fields, methods, and the source root.

use brioc_util::ParseError;

use crate::ast::{Field, Method, Source};
use crate::pattern::Pat;
use crate::Parser;

impl Parser {
    /// Parses an entire source file: `field* method*`.
    pub fn parse_source(&mut self) -> Result<Source, ParseError> {
        let mut fields = Vec::new();
        while self.peek(&[Pat::Lit("LET")]) {
            fields.push(self.parse_field()?);
        }

        let mut methods = Vec::new();
        while self.peek(&[Pat::Lit("DEF")]) {
            methods.push(self.parse_method()?);
        }

        if !self.at_end() {
            return Err(self.error_here("expected 'LET', 'DEF', or end of input"));
        }
        Ok(Source { fields, methods })
    }

    /// `'LET' declaration` at the top level.
    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let index = self.next_index();
        self.expect(Pat::Lit("LET"), "'LET'")?;
        let declaration = self.parse_declaration()?;
        Ok(Field {
            name: declaration.name,
            type_name: declaration.type_name,
            value: declaration.value,
            index,
            binding: None,
        })
    }

    /// `'DEF' IDENT '(' params? ')' (':' IDENT)? 'DO' stmt* 'END'`
    fn parse_method(&mut self) -> Result<Method, ParseError> {
        let index = self.next_index();
        self.expect(Pat::Lit("DEF"), "'DEF'")?;
        let name = self.expect_identifier("method name after DEF")?;
        self.expect(Pat::Lit("("), "'(' after method name")?;

        let mut params = Vec::new();
        let mut param_type_names = Vec::new();
        if !self.peek(&[Pat::Lit(")")]) {
            loop {
                params.push(self.expect_identifier("parameter name")?);
                param_type_names.push(if self.take(&[Pat::Lit(":")]) {
                    Some(self.expect_identifier("parameter type after ':'")?)
                } else {
                    None
                });
                if !self.take(&[Pat::Lit(",")]) {
                    break;
                }
            }
        }
        self.expect(Pat::Lit(")"), "')' after parameters")?;

        let return_type_name = if self.take(&[Pat::Lit(":")]) {
            Some(self.expect_identifier("return type after ':'")?)
        } else {
            None
        };

        self.expect(Pat::Lit("DO"), "'DO' before method body")?;
        let body = self.parse_block(&["END"])?;
        self.expect(Pat::Lit("END"), "'END' closing method")?;

        Ok(Method {
            name,
            params,
            param_type_names,
            return_type_name,
            body,
            index,
            binding: None,
        })
    }
}
