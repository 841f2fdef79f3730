//! Statement parsing.

use brioc_util::ParseError;

use crate::ast::{Declaration, Stmt, StmtKind};
use crate::pattern::Pat;
use crate::Parser;

impl Parser {
    /// Parses a single statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let index = self.next_index();

        if self.take(&[Pat::Lit("LET")]) {
            let declaration = self.parse_declaration()?;
            return Ok(Stmt::new(StmtKind::Declaration(declaration), index));
        }

        if self.take(&[Pat::Lit("IF")]) {
            let condition = self.parse_expression()?;
            self.expect(Pat::Lit("DO"), "'DO' after IF condition")?;
            let then_body = self.parse_block(&["ELSE", "END"])?;
            let else_body = if self.take(&[Pat::Lit("ELSE")]) {
                self.parse_block(&["END"])?
            } else {
                Vec::new()
            };
            self.expect(Pat::Lit("END"), "'END' closing IF statement")?;
            return Ok(Stmt::new(
                StmtKind::If {
                    condition,
                    then_body,
                    else_body,
                },
                index,
            ));
        }

        if self.take(&[Pat::Lit("FOR")]) {
            let name = self.expect_identifier("loop variable after FOR")?;
            self.expect(Pat::Lit("IN"), "'IN' after loop variable")?;
            let iterable = self.parse_expression()?;
            self.expect(Pat::Lit("DO"), "'DO' after FOR iterable")?;
            let body = self.parse_block(&["END"])?;
            self.expect(Pat::Lit("END"), "'END' closing FOR statement")?;
            return Ok(Stmt::new(
                StmtKind::For {
                    name,
                    iterable,
                    body,
                },
                index,
            ));
        }

        if self.take(&[Pat::Lit("WHILE")]) {
            let condition = self.parse_expression()?;
            self.expect(Pat::Lit("DO"), "'DO' after WHILE condition")?;
            let body = self.parse_block(&["END"])?;
            self.expect(Pat::Lit("END"), "'END' closing WHILE statement")?;
            return Ok(Stmt::new(StmtKind::While { condition, body }, index));
        }

        if self.take(&[Pat::Lit("RETURN")]) {
            let value = self.parse_expression()?;
            self.expect(Pat::Lit(";"), "';' after RETURN value")?;
            return Ok(Stmt::new(StmtKind::Return { value }, index));
        }

        // expr ('=' expr)? ';'
        let expr = self.parse_expression()?;
        if self.take(&[Pat::Lit("=")]) {
            let value = self.parse_expression()?;
            self.expect(Pat::Lit(";"), "';' after assignment")?;
            return Ok(Stmt::new(
                StmtKind::Assignment {
                    receiver: expr,
                    value,
                },
                index,
            ));
        }
        self.expect(Pat::Lit(";"), "';' after expression statement")?;
        Ok(Stmt::new(StmtKind::Expression(expr), index))
    }

    /// `IDENT (':' IDENT)? ('=' expr)? ';'`, shared by `LET`
    /// statements and top-level fields. The leading `LET` has already
    /// been consumed.
    pub(crate) fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let name = self.expect_identifier("name after LET")?;
        let type_name = if self.take(&[Pat::Lit(":")]) {
            Some(self.expect_identifier("type name after ':'")?)
        } else {
            None
        };
        let value = if self.take(&[Pat::Lit("=")]) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(Pat::Lit(";"), "';' after declaration")?;
        Ok(Declaration {
            name,
            type_name,
            value,
            binding: None,
        })
    }

    /// Parses statements until one of the `stops` keywords or the end
    /// of input. The stop token itself is left for the caller.
    pub(crate) fn parse_block(&mut self, stops: &[&'static str]) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.at_end() && !stops.iter().any(|&stop| self.peek(&[Pat::Lit(stop)])) {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }
}
