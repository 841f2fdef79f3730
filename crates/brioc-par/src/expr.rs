//! Expression parsing: one function per precedence level.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use brioc_lex::TokenKind;
use brioc_util::ParseError;
use num_bigint::BigInt;

use crate::ast::{Access, BinOp, Call, Expr, ExprKind, LiteralValue};
use crate::pattern::Pat;
use crate::Parser;

const LOGICAL_OPS: &[&str] = &["AND", "OR"];
const EQUALITY_OPS: &[&str] = &["<=", ">=", "==", "!=", "<", ">"];
const ADDITIVE_OPS: &[&str] = &["+", "-"];
const MULTIPLICATIVE_OPS: &[&str] = &["*", "/"];

impl Parser {
    /// Entry point: the lowest precedence level.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical()
    }

    fn parse_logical(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while let Some(op) = self.take_operator(LOGICAL_OPS) {
            let right = self.parse_equality()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.take_operator(EQUALITY_OPS) {
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.take_operator(ADDITIVE_OPS) {
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_secondary()?;
        while let Some(op) = self.take_operator(MULTIPLICATIVE_OPS) {
            let right = self.parse_secondary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// Chained member access and method calls: `recv.name` and
    /// `recv.name(args)`.
    fn parse_secondary(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.take(&[Pat::Lit(".")]) {
            let name = self.expect_identifier("member name after '.'")?;
            let index = expr.index;
            if self.take(&[Pat::Lit("(")]) {
                let args = self.parse_args()?;
                self.expect(Pat::Lit(")"), "')' after arguments")?;
                expr = Expr::new(
                    ExprKind::Call(Call {
                        receiver: Some(Box::new(expr)),
                        name,
                        args,
                        binding: None,
                    }),
                    index,
                );
            } else {
                expr = Expr::new(
                    ExprKind::Access(Access {
                        receiver: Some(Box::new(expr)),
                        name,
                        binding: None,
                    }),
                    index,
                );
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let index = self.next_index();

        if self.take(&[Pat::Lit("NIL")]) {
            return Ok(Expr::new(ExprKind::Literal(LiteralValue::Nil), index));
        }
        if self.take(&[Pat::Lit("TRUE")]) {
            return Ok(Expr::new(
                ExprKind::Literal(LiteralValue::Boolean(true)),
                index,
            ));
        }
        if self.take(&[Pat::Lit("FALSE")]) {
            return Ok(Expr::new(
                ExprKind::Literal(LiteralValue::Boolean(false)),
                index,
            ));
        }

        if self.peek(&[Pat::Kind(TokenKind::Integer)]) {
            let token = self.expect(Pat::Kind(TokenKind::Integer), "integer literal")?;
            let value = BigInt::from_str(&token.literal).map_err(|_| {
                ParseError::new(format!("invalid integer literal '{}'", token.literal), index)
            })?;
            return Ok(Expr::new(
                ExprKind::Literal(LiteralValue::Integer(value)),
                index,
            ));
        }

        if self.peek(&[Pat::Kind(TokenKind::Decimal)]) {
            let token = self.expect(Pat::Kind(TokenKind::Decimal), "decimal literal")?;
            let value = BigDecimal::from_str(&token.literal).map_err(|_| {
                ParseError::new(format!("invalid decimal literal '{}'", token.literal), index)
            })?;
            return Ok(Expr::new(
                ExprKind::Literal(LiteralValue::Decimal(value)),
                index,
            ));
        }

        if self.peek(&[Pat::Kind(TokenKind::Character)]) {
            let token = self.expect(Pat::Kind(TokenKind::Character), "character literal")?;
            let inner = &token.literal[1..token.literal.len() - 1];
            let decoded = decode_escapes(inner, index)?;
            let mut chars = decoded.chars();
            let value = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(ParseError::new(
                        format!("invalid character literal {}", token.literal),
                        index,
                    ))
                }
            };
            return Ok(Expr::new(
                ExprKind::Literal(LiteralValue::Character(value)),
                index,
            ));
        }

        if self.peek(&[Pat::Kind(TokenKind::Str)]) {
            let token = self.expect(Pat::Kind(TokenKind::Str), "string literal")?;
            let inner = &token.literal[1..token.literal.len() - 1];
            let value = decode_escapes(inner, index)?;
            return Ok(Expr::new(
                ExprKind::Literal(LiteralValue::String(value)),
                index,
            ));
        }

        if self.peek(&[Pat::Kind(TokenKind::Identifier)]) {
            let name = self.expect_identifier("identifier")?;
            if self.take(&[Pat::Lit("(")]) {
                let args = self.parse_args()?;
                self.expect(Pat::Lit(")"), "')' after arguments")?;
                return Ok(Expr::new(
                    ExprKind::Call(Call {
                        receiver: None,
                        name,
                        args,
                        binding: None,
                    }),
                    index,
                ));
            }
            return Ok(Expr::new(
                ExprKind::Access(Access {
                    receiver: None,
                    name,
                    binding: None,
                }),
                index,
            ));
        }

        if self.take(&[Pat::Lit("(")]) {
            let inner = self.parse_expression()?;
            self.expect(Pat::Lit(")"), "')' after expression")?;
            return Ok(Expr::new(ExprKind::Group(Box::new(inner)), index));
        }

        Err(self.error_here("expected expression"))
    }

    /// Comma-separated argument list; the caller consumes the parens.
    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.peek(&[Pat::Lit(")")]) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.take(&[Pat::Lit(",")]) {
                break;
            }
        }
        Ok(args)
    }

    /// Consumes the first matching operator literal, if any.
    fn take_operator(&mut self, ops: &[&'static str]) -> Option<BinOp> {
        for &op in ops {
            if self.take(&[Pat::Lit(op)]) {
                return BinOp::from_literal(op);
            }
        }
        None
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    let index = left.index;
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        index,
    )
}

/// Resolves the escape sequences of a quoted literal's inner text.
///
/// The lexer has already validated the escapes, but decoding re-checks
/// them so this function is safe on any input.
fn decode_escapes(inner: &str, index: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escape = chars
            .next()
            .ok_or_else(|| ParseError::new("unterminated escape sequence", index))?;
        let decoded = match escape {
            'b' => '\u{0008}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            other => {
                return Err(ParseError::new(
                    format!("invalid escape sequence '\\{}'", other),
                    index,
                ))
            }
        };
        out.push(decoded);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brioc_lex::lex;

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(lex(source).unwrap());
        let expr = parser.parse_expression().unwrap();
        assert!(parser.at_end(), "leftover tokens in {:?}", source);
        expr
    }

    fn as_binary(expr: &Expr) -> (BinOp, &Expr, &Expr) {
        match &expr.kind {
            ExprKind::Binary { op, left, right } => (*op, left, right),
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    fn as_int(expr: &Expr) -> i64 {
        match &expr.kind {
            ExprKind::Literal(LiteralValue::Integer(n)) => {
                i64::try_from(n.clone()).expect("integer fits i64")
            }
            other => panic!("expected integer literal, got {:?}", other),
        }
    }

    // =========================================================================
    // LITERAL TESTS
    // =========================================================================

    #[test]
    fn test_parse_nil_and_booleans() {
        assert!(matches!(
            parse_expr("NIL").kind,
            ExprKind::Literal(LiteralValue::Nil)
        ));
        assert!(matches!(
            parse_expr("TRUE").kind,
            ExprKind::Literal(LiteralValue::Boolean(true))
        ));
        assert!(matches!(
            parse_expr("FALSE").kind,
            ExprKind::Literal(LiteralValue::Boolean(false))
        ));
    }

    #[test]
    fn test_parse_integer_literal() {
        assert_eq!(as_int(&parse_expr("42")), 42);
        assert_eq!(as_int(&parse_expr("-7")), -7);
        assert_eq!(as_int(&parse_expr("+7")), 7);
    }

    #[test]
    fn test_parse_huge_integer_literal() {
        // Arbitrary precision at the parse level; the analyzer imposes
        // the 32-bit constraint later.
        let expr = parse_expr("123456789012345678901234567890");
        match &expr.kind {
            ExprKind::Literal(LiteralValue::Integer(n)) => {
                assert_eq!(n.to_string(), "123456789012345678901234567890");
            }
            other => panic!("expected integer, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_decimal_literal() {
        let expr = parse_expr("3.14");
        match &expr.kind {
            ExprKind::Literal(LiteralValue::Decimal(d)) => {
                assert_eq!(d.to_string(), "3.14");
            }
            other => panic!("expected decimal, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_character_literal_decodes_escapes() {
        assert!(matches!(
            parse_expr("'a'").kind,
            ExprKind::Literal(LiteralValue::Character('a'))
        ));
        assert!(matches!(
            parse_expr("'\\n'").kind,
            ExprKind::Literal(LiteralValue::Character('\n'))
        ));
        assert!(matches!(
            parse_expr("'\\''").kind,
            ExprKind::Literal(LiteralValue::Character('\''))
        ));
    }

    #[test]
    fn test_parse_string_literal_strips_quotes_and_decodes() {
        assert!(
            matches!(parse_expr("\"a\\\"b\\nc\"").kind,
            ExprKind::Literal(LiteralValue::String(s)) if s == "a\"b\nc")
        );
        assert!(
            matches!(parse_expr("\"\"").kind,
            ExprKind::Literal(LiteralValue::String(s)) if s.is_empty())
        );
    }

    // =========================================================================
    // PRECEDENCE AND ASSOCIATIVITY TESTS
    // =========================================================================

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expr("1 + 2 * 3");
        let (op, left, right) = as_binary(&expr);
        assert_eq!(op, BinOp::Add);
        assert_eq!(as_int(left), 1);
        let (inner_op, inner_left, inner_right) = as_binary(right);
        assert_eq!(inner_op, BinOp::Mul);
        assert_eq!(as_int(inner_left), 2);
        assert_eq!(as_int(inner_right), 3);
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let expr = parse_expr("1 - 2 - 3");
        let (op, left, right) = as_binary(&expr);
        assert_eq!(op, BinOp::Sub);
        assert_eq!(as_int(right), 3);
        let (inner_op, inner_left, inner_right) = as_binary(left);
        assert_eq!(inner_op, BinOp::Sub);
        assert_eq!(as_int(inner_left), 1);
        assert_eq!(as_int(inner_right), 2);
    }

    #[test]
    fn test_comparison_binds_looser_than_addition() {
        // a + 1 < b parses as (a + 1) < b
        let expr = parse_expr("a + 1 < b");
        let (op, left, _) = as_binary(&expr);
        assert_eq!(op, BinOp::Lt);
        let (inner_op, _, _) = as_binary(left);
        assert_eq!(inner_op, BinOp::Add);
    }

    #[test]
    fn test_logical_binds_loosest() {
        // x < 1 AND y > 2 parses as (x < 1) AND (y > 2)
        let expr = parse_expr("x < 1 AND y > 2");
        let (op, left, right) = as_binary(&expr);
        assert_eq!(op, BinOp::And);
        assert_eq!(as_binary(left).0, BinOp::Lt);
        assert_eq!(as_binary(right).0, BinOp::Gt);
    }

    #[test]
    fn test_logical_left_associative() {
        // a AND b OR c parses as (a AND b) OR c: same precedence level.
        let expr = parse_expr("a AND b OR c");
        let (op, left, _) = as_binary(&expr);
        assert_eq!(op, BinOp::Or);
        assert_eq!(as_binary(left).0, BinOp::And);
    }

    #[test]
    fn test_group_overrides_precedence() {
        // (1 + 2) * 3: the group shows up as an explicit node.
        let expr = parse_expr("(1 + 2) * 3");
        let (op, left, right) = as_binary(&expr);
        assert_eq!(op, BinOp::Mul);
        assert_eq!(as_int(right), 3);
        match &left.kind {
            ExprKind::Group(inner) => assert_eq!(as_binary(inner).0, BinOp::Add),
            other => panic!("expected group, got {:?}", other),
        }
    }

    // =========================================================================
    // ACCESS AND CALL TESTS
    // =========================================================================

    #[test]
    fn test_plain_identifier_is_access() {
        let expr = parse_expr("x");
        match &expr.kind {
            ExprKind::Access(access) => {
                assert_eq!(access.name, "x");
                assert!(access.receiver.is_none());
            }
            other => panic!("expected access, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_with_parens_is_call() {
        let expr = parse_expr("f(1, 2)");
        match &expr.kind {
            ExprKind::Call(call) => {
                assert_eq!(call.name, "f");
                assert!(call.receiver.is_none());
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_argument_call() {
        let expr = parse_expr("f()");
        match &expr.kind {
            ExprKind::Call(call) => assert!(call.args.is_empty()),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_member_access_and_calls() {
        // obj.field.compute(1).next is left-nested through receivers.
        let expr = parse_expr("obj.field.compute(1).next");
        let access = match &expr.kind {
            ExprKind::Access(access) => access,
            other => panic!("expected access, got {:?}", other),
        };
        assert_eq!(access.name, "next");

        let call = match &access.receiver.as_ref().unwrap().kind {
            ExprKind::Call(call) => call,
            other => panic!("expected call receiver, got {:?}", other),
        };
        assert_eq!(call.name, "compute");
        assert_eq!(call.args.len(), 1);

        let field = match &call.receiver.as_ref().unwrap().kind {
            ExprKind::Access(access) => access,
            other => panic!("expected access receiver, got {:?}", other),
        };
        assert_eq!(field.name, "field");
        assert!(matches!(
            &field.receiver.as_ref().unwrap().kind,
            ExprKind::Access(root) if root.name == "obj" && root.receiver.is_none()
        ));
    }

    #[test]
    fn test_method_call_on_literal() {
        let expr = parse_expr("\"abc\".size()");
        match &expr.kind {
            ExprKind::Call(call) => {
                assert_eq!(call.name, "size");
                assert!(call.receiver.is_some());
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    // =========================================================================
    // ERROR TESTS
    // =========================================================================

    #[test]
    fn test_missing_operand_fails() {
        let mut parser = Parser::new(lex("1 +").unwrap());
        // "+" with no digit after it lexes as an operator, so the
        // additive level demands a right operand.
        let err = parser.parse_expression().unwrap_err();
        assert!(err.message.contains("expected expression"));
        assert_eq!(err.index, 3);
    }

    #[test]
    fn test_unclosed_group_fails() {
        let mut parser = Parser::new(lex("(1 + 2").unwrap());
        let err = parser.parse_expression().unwrap_err();
        assert!(err.message.contains("')'"));
    }

    #[test]
    fn test_unclosed_call_fails() {
        let mut parser = Parser::new(lex("f(1,").unwrap());
        assert!(parser.parse_expression().is_err());
    }

    #[test]
    fn test_expression_indices_point_at_first_token() {
        let expr = parse_expr("  1 + 2");
        assert_eq!(expr.index, 2);
        let (_, left, right) = as_binary(&expr);
        assert_eq!(left.index, 2);
        assert_eq!(right.index, 6);
    }
}
