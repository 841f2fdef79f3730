//! The interpreter: statement execution and expression evaluation.

use std::cmp::Ordering;
use std::io::Write;
use std::rc::Rc;

use bigdecimal::rounding::RoundingMode;
use brioc_env::{builtins, ScopeId, ScopeTree};
use brioc_par::{BinOp, Expr, ExprKind, LiteralValue, Source, Stmt, StmtKind};
use brioc_util::RuntimeError;
use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::value::Value;

/// A callable bound in a runtime scope.
#[derive(Debug, Clone)]
pub enum RuntimeFn {
    Builtin(Builtin),
    Method(Rc<MethodDef>),
}

/// The host-provided built-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Range,
}

/// A user method closed over its definition scope.
#[derive(Debug)]
pub struct MethodDef {
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    /// The scope the method was defined in; invocations chain on this,
    /// never on the caller's scope.
    pub scope: ScopeId,
}

/// How control leaves a statement: either it ran to completion, or a
/// `RETURN` is unwinding with its value. Bodies propagate `Return`
/// untouched; only the method-invocation boundary consumes it.
enum Flow {
    Normal,
    Return(Value),
}

/// Interprets an analyzed source tree, returning `main()`'s value.
///
/// `out` receives the output of the `print` built-in, one line per
/// call.
pub fn interpret(source: &Source, out: &mut dyn Write) -> Result<Value, RuntimeError> {
    Interpreter::new(out).run(source)
}

/// Tree-walking evaluator.
pub struct Interpreter<'a> {
    scopes: ScopeTree<Value, RuntimeFn>,
    out: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter with the built-ins installed in its root
    /// scope, printing to `out`.
    pub fn new(out: &'a mut dyn Write) -> Self {
        let mut scopes = ScopeTree::new();
        scopes.define_function(builtins::PRINT, 1, RuntimeFn::Builtin(Builtin::Print));
        scopes.define_function(builtins::RANGE, 2, RuntimeFn::Builtin(Builtin::Range));
        Self { scopes, out }
    }

    /// Binds fields and methods in the global scope, then invokes
    /// `main()`.
    pub fn run(&mut self, source: &Source) -> Result<Value, RuntimeError> {
        for field in &source.fields {
            let value = match &field.value {
                Some(expr) => self.eval(expr)?,
                None => Value::Nil,
            };
            self.scopes.define_variable(field.name.clone(), value);
        }

        for method in &source.methods {
            let def = MethodDef {
                params: method.params.clone(),
                body: method.body.clone(),
                scope: self.scopes.current(),
            };
            self.scopes.define_function(
                method.name.clone(),
                method.params.len(),
                RuntimeFn::Method(Rc::new(def)),
            );
        }

        self.call("main", Vec::new())
    }

    /// Invokes a function by name and evaluated arguments.
    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let callee = self
            .scopes
            .lookup_function(name, args.len())
            .cloned()
            .ok_or_else(|| {
                RuntimeError::new(format!("function '{}/{}' is not defined", name, args.len()))
            })?;

        match callee {
            RuntimeFn::Builtin(Builtin::Print) => self.builtin_print(args),
            RuntimeFn::Builtin(Builtin::Range) => builtin_range(args),
            RuntimeFn::Method(def) => {
                let prev = self.scopes.current();
                self.scopes.enter_at(def.scope);
                for (param, arg) in def.params.iter().zip(args) {
                    self.scopes.define_variable(param.clone(), arg);
                }
                let flow = self.exec_block(&def.body);
                self.scopes.exit_to(prev);
                match flow? {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal => Ok(Value::Nil),
                }
            }
        }
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            }

            StmtKind::Declaration(decl) => {
                let value = match &decl.value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                self.scopes.define_variable(decl.name.clone(), value);
                Ok(Flow::Normal)
            }

            StmtKind::Assignment { receiver, value } => {
                let access = match &receiver.kind {
                    ExprKind::Access(access) => access,
                    _ => {
                        return Err(RuntimeError::new(
                            "assignment target must be an access expression",
                        ))
                    }
                };
                let value = self.eval(value)?;
                match &access.receiver {
                    Some(object_expr) => {
                        let object = self.eval(object_expr)?;
                        match object {
                            Value::Object(object) => {
                                object
                                    .borrow_mut()
                                    .fields
                                    .insert(access.name.clone(), value);
                            }
                            other => {
                                return Err(RuntimeError::new(format!(
                                    "cannot assign field '{}' on a {} value",
                                    access.name,
                                    other.type_name()
                                )))
                            }
                        }
                    }
                    None => {
                        let slot =
                            self.scopes
                                .lookup_variable_mut(&access.name)
                                .ok_or_else(|| {
                                    RuntimeError::new(format!(
                                        "variable '{}' is not defined",
                                        access.name
                                    ))
                                })?;
                        *slot = value;
                    }
                }
                Ok(Flow::Normal)
            }

            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                let branch = if self.eval_condition(condition)? {
                    then_body
                } else {
                    else_body
                };
                self.in_child_scope(|this| this.exec_block(branch))
            }

            StmtKind::While { condition, body } => {
                while self.eval_condition(condition)? {
                    if let Flow::Return(value) =
                        self.in_child_scope(|this| this.exec_block(body))?
                    {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            StmtKind::For {
                name,
                iterable,
                body,
            } => {
                let items = match self.eval(iterable)? {
                    Value::List(items) => items,
                    other => {
                        return Err(RuntimeError::new(format!(
                            "FOR requires an iterable, found {}",
                            other.type_name()
                        )))
                    }
                };
                for item in items {
                    let flow = self.in_child_scope(|this| {
                        this.scopes.define_variable(name.clone(), item);
                        this.exec_block(body)
                    })?;
                    if let Flow::Return(value) = flow {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            StmtKind::Return { value } => {
                let value = self.eval(value)?;
                Ok(Flow::Return(value))
            }
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(literal_value(literal)),

            ExprKind::Group(inner) => self.eval(inner),

            ExprKind::Binary { op, left, right } => {
                // Both operands are always evaluated, AND/OR included;
                // short-circuiting is not part of the semantics.
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(*op, left, right)
            }

            ExprKind::Access(access) => match &access.receiver {
                Some(receiver) => {
                    let receiver = self.eval(receiver)?;
                    match receiver {
                        Value::Object(object) => object
                            .borrow()
                            .fields
                            .get(&access.name)
                            .cloned()
                            .ok_or_else(|| {
                                RuntimeError::new(format!(
                                    "object has no field '{}'",
                                    access.name
                                ))
                            }),
                        other => Err(RuntimeError::new(format!(
                            "a {} value has no fields",
                            other.type_name()
                        ))),
                    }
                }
                None => self
                    .scopes
                    .lookup_variable(&access.name)
                    .cloned()
                    .ok_or_else(|| {
                        RuntimeError::new(format!(
                            "variable '{}' is not defined",
                            access.name
                        ))
                    }),
            },

            ExprKind::Call(call) => match &call.receiver {
                Some(receiver) => {
                    let receiver = self.eval(receiver)?;
                    Err(RuntimeError::new(format!(
                        "type {} has no method '{}/{}'",
                        receiver.type_name(),
                        call.name,
                        call.args.len()
                    )))
                }
                None => {
                    let mut args = Vec::with_capacity(call.args.len());
                    for arg in &call.args {
                        args.push(self.eval(arg)?);
                    }
                    self.call(&call.name, args)
                }
            },
        }
    }

    fn eval_condition(&mut self, condition: &Expr) -> Result<bool, RuntimeError> {
        match self.eval(condition)? {
            Value::Boolean(b) => Ok(b),
            other => Err(RuntimeError::new(format!(
                "condition must be a boolean, found {}",
                other.type_name()
            ))),
        }
    }

    /// Runs `f` in a fresh child scope, restoring the previous scope on
    /// every exit path.
    fn in_child_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let prev = self.scopes.current();
        self.scopes.enter();
        let result = f(self);
        self.scopes.exit_to(prev);
        result
    }

    /// `print(Any) -> Nil`: one display-formatted line to the sink.
    fn builtin_print(&mut self, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let value = args.into_iter().next().unwrap_or(Value::Nil);
        writeln!(self.out, "{}", value)
            .map_err(|e| RuntimeError::new(format!("print failed: {}", e)))?;
        Ok(Value::Nil)
    }
}

fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Nil => Value::Nil,
        LiteralValue::Boolean(b) => Value::Boolean(*b),
        LiteralValue::Integer(n) => Value::Integer(n.clone()),
        LiteralValue::Decimal(d) => Value::Decimal(d.clone()),
        LiteralValue::Character(c) => Value::Character(*c),
        LiteralValue::String(s) => Value::String(s.clone()),
    }
}

/// `range(Integer, Integer) -> IntegerIterable`: the half-open range
/// `[start, end)`, empty when `start >= end`.
fn builtin_range(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(Value::Integer(start)), Some(Value::Integer(end))) => {
            let mut items = Vec::new();
            let mut current = start;
            while current < end {
                items.push(Value::Integer(current.clone()));
                current += BigInt::one();
            }
            Ok(Value::List(items))
        }
        (Some(a), Some(b)) => Err(RuntimeError::new(format!(
            "range requires Integer bounds, found {} and {}",
            a.type_name(),
            b.type_name()
        ))),
        _ => Err(RuntimeError::new("range requires two arguments")),
    }
}

fn binary(op: BinOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        BinOp::And => logical(op, left, right, |a, b| a && b),
        BinOp::Or => logical(op, left, right, |a, b| a || b),

        BinOp::Eq => Ok(Value::Boolean(left == right)),
        BinOp::Ne => Ok(Value::Boolean(left != right)),

        // Relational comparison is defined for two values of the same
        // ordered runtime type; any other pairing yields nil.
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => Ok(match compare(&left, &right) {
            Some(ordering) => Value::Boolean(match op {
                BinOp::Lt => ordering == Ordering::Less,
                BinOp::Le => ordering != Ordering::Greater,
                BinOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }),
            None => Value::Nil,
        }),

        BinOp::Add => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            (a, b) => Err(type_mismatch(op, &a, &b)),
        },

        BinOp::Sub => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a - b)),
            (a, b) => Err(type_mismatch(op, &a, &b)),
        },

        BinOp::Mul => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a * b)),
            (a, b) => Err(type_mismatch(op, &a, &b)),
        },

        BinOp::Div => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => {
                if b.is_zero() {
                    return Err(RuntimeError::new("division by zero"));
                }
                Ok(Value::Integer(a / b))
            }
            (Value::Decimal(a), Value::Decimal(b)) => {
                if b.is_zero() {
                    return Err(RuntimeError::new("division by zero"));
                }
                // Banker's rounding at the dividend's scale, matching
                // arbitrary-precision decimal division semantics.
                let quotient = &a / &b;
                Ok(Value::Decimal(
                    quotient.with_scale_round(a.fractional_digit_count(), RoundingMode::HalfEven),
                ))
            }
            (a, b) => Err(type_mismatch(op, &a, &b)),
        },
    }
}

fn logical(
    op: BinOp,
    left: Value,
    right: Value,
    apply: fn(bool, bool) -> bool,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(apply(a, b))),
        (a, b) => Err(type_mismatch(op, &a, &b)),
    }
}

/// Natural ordering for two values of the same runtime type: integers
/// and decimals numerically, characters by code point, strings
/// lexicographically. `None` for every other pairing.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Character(a), Value::Character(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn type_mismatch(op: BinOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::new(format!(
        "cannot apply '{}' to {} and {}",
        op.literal(),
        left.type_name(),
        right.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brioc_lex::lex;
    use brioc_par::parse;

    /// Lex, parse, analyze and interpret, capturing print output.
    fn run(text: &str) -> (Result<Value, RuntimeError>, String) {
        let mut source = parse(lex(text).unwrap()).unwrap();
        brioc_sem::analyze(&mut source).unwrap();
        let mut out = Vec::new();
        let result = interpret(&source, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn run_ok(text: &str) -> (Value, String) {
        let (result, output) = run(text);
        (result.unwrap(), output)
    }

    fn int(n: i64) -> Value {
        Value::Integer(BigInt::from(n))
    }

    // =========================================================================
    // END-TO-END SCENARIOS
    // =========================================================================

    #[test]
    fn test_trivial_main_returns_zero() {
        let (value, output) = run_ok("DEF main() DO RETURN 0; END");
        assert_eq!(value, int(0));
        assert!(output.is_empty());
    }

    #[test]
    fn test_field_assignment_and_print() {
        let (value, output) =
            run_ok("LET x = 1; DEF main() DO x = x + 2; print(x); RETURN 0; END");
        assert_eq!(value, int(0));
        assert_eq!(output, "3\n");
    }

    #[test]
    fn test_if_takes_the_true_branch() {
        let (_, output) = run_ok(
            "DEF main() DO IF TRUE DO print(\"t\"); ELSE print(\"f\"); END RETURN 0; END",
        );
        assert_eq!(output, "t\n");
    }

    #[test]
    fn test_if_takes_the_false_branch() {
        let (_, output) = run_ok(
            "DEF main() DO IF 1 > 2 DO print(\"t\"); ELSE print(\"f\"); END RETURN 0; END",
        );
        assert_eq!(output, "f\n");
    }

    #[test]
    fn test_for_over_range_accumulates_string() {
        let (_, output) = run_ok(
            "DEF main() DO LET s = \"\"; FOR i IN range(0, 3) DO s = s + \".\"; END \
             print(s); RETURN 0; END",
        );
        assert_eq!(output, "...\n");
    }

    #[test]
    fn test_division_by_zero_fails() {
        let (result, _) = run("DEF main() DO print(1 / 0); RETURN 0; END");
        assert_eq!(result.unwrap_err().message, "division by zero");
    }

    // =========================================================================
    // ARITHMETIC TESTS
    // =========================================================================

    #[test]
    fn test_integer_arithmetic_is_arbitrary_precision() {
        // Literals are bounded to 32 bits, computed values are not.
        let (_, output) = run_ok(
            "DEF main() DO print(2000000000 + 2000000000); \
             print(2000000000 * 2000000000); RETURN 0; END",
        );
        assert_eq!(output, "4000000000\n4000000000000000000\n");
    }

    #[test]
    fn test_integer_division_truncates_toward_zero() {
        let (_, output) =
            run_ok("DEF main() DO print(7 / 2); print(-7 / 2); RETURN 0; END");
        assert_eq!(output, "3\n-3\n");
    }

    #[test]
    fn test_decimal_division_rounds_half_even() {
        let (_, output) = run_ok(
            "DEF main() DO print(1.0 / 3.0); print(0.25 / 2.0); print(5.0 / 2.0); \
             RETURN 0; END",
        );
        // 0.125 at scale 2 is a tie; banker's rounding keeps the even
        // digit: 0.12.
        assert_eq!(output, "0.3\n0.12\n2.5\n");
    }

    #[test]
    fn test_decimal_division_by_zero_fails() {
        let (result, _) = run("DEF main() DO print(1.0 / 0.0); RETURN 0; END");
        assert_eq!(result.unwrap_err().message, "division by zero");
    }

    #[test]
    fn test_string_concatenation() {
        let (_, output) = run_ok("DEF main() DO print(\"ab\" + \"cd\"); RETURN 0; END");
        assert_eq!(output, "abcd\n");
    }

    #[test]
    fn test_mixed_plus_fails_at_runtime() {
        // The analyzer types `1 + "a"` as String, but the evaluator
        // only concatenates two strings.
        let (result, _) = run("DEF main() DO print(1 + \"a\"); RETURN 0; END");
        assert!(result.unwrap_err().message.contains("cannot apply '+'"));
    }

    // =========================================================================
    // COMPARISON AND LOGIC TESTS
    // =========================================================================

    #[test]
    fn test_relational_operators() {
        let (_, output) = run_ok(
            "DEF main() DO print(1 < 2); print(2 <= 1); print('b' > 'a'); \
             print(\"abc\" >= \"abd\"); RETURN 0; END",
        );
        assert_eq!(output, "true\nfalse\ntrue\nfalse\n");
    }

    #[test]
    fn test_relational_mismatch_yields_nil() {
        let (_, output) = run_ok("DEF main() DO print(1 < 1.5); RETURN 0; END");
        assert_eq!(output, "nil\n");
    }

    #[test]
    fn test_equality_is_structural() {
        let (_, output) = run_ok(
            "DEF main() DO print(1 == 1); print(\"a\" != \"b\"); print(1.5 == 1.5); \
             RETURN 0; END",
        );
        assert_eq!(output, "true\ntrue\ntrue\n");
    }

    #[test]
    fn test_or_evaluates_both_operands() {
        // No short-circuiting: the right-hand call still runs.
        let (_, output) = run_ok(
            "DEF noisy(): Boolean DO print(\"side\"); RETURN TRUE; END \
             DEF main() DO LET b = TRUE OR noisy(); print(b); RETURN 0; END",
        );
        assert_eq!(output, "side\ntrue\n");
    }

    #[test]
    fn test_and_or_truth_tables() {
        let (_, output) = run_ok(
            "DEF main() DO print(TRUE AND FALSE); print(TRUE OR FALSE); \
             print(FALSE OR FALSE); RETURN 0; END",
        );
        assert_eq!(output, "false\ntrue\nfalse\n");
    }

    // =========================================================================
    // CONTROL FLOW AND SCOPE TESTS
    // =========================================================================

    #[test]
    fn test_while_loop() {
        let (value, output) = run_ok(
            "DEF main() DO LET n = 3; WHILE n > 0 DO print(n); n = n - 1; END \
             RETURN n; END",
        );
        assert_eq!(value, int(0));
        assert_eq!(output, "3\n2\n1\n");
    }

    #[test]
    fn test_return_unwinds_nested_loops_and_branches() {
        let (value, _) = run_ok(
            "DEF find(): Integer DO \
             FOR i IN range(0, 10) DO IF i == 3 DO RETURN i; END END \
             RETURN -1; END \
             DEF main() DO RETURN find(); END",
        );
        assert_eq!(value, int(3));
    }

    #[test]
    fn test_falling_off_a_method_yields_nil() {
        let (_, output) = run_ok(
            "DEF f(): Any DO print(1); END \
             DEF main() DO print(f()); RETURN 0; END",
        );
        assert_eq!(output, "1\nnil\n");
    }

    #[test]
    fn test_parameters_bind_positionally() {
        let (value, _) = run_ok(
            "DEF sub(a: Integer, b: Integer): Integer DO RETURN a - b; END \
             DEF main() DO RETURN sub(10, 4); END",
        );
        assert_eq!(value, int(6));
    }

    #[test]
    fn test_methods_see_fields_through_their_definition_scope() {
        let (value, _) = run_ok(
            "LET counter = 0; \
             DEF bump(): Integer DO counter = counter + 1; RETURN counter; END \
             DEF main() DO bump(); bump(); RETURN bump(); END",
        );
        assert_eq!(value, int(3));
    }

    #[test]
    fn test_block_locals_do_not_leak_but_outer_assignments_stick() {
        let (value, output) = run_ok(
            "DEF main() DO LET x = 1; \
             IF TRUE DO LET y = 10; x = x + y; END \
             print(x); RETURN x; END",
        );
        assert_eq!(value, int(11));
        assert_eq!(output, "11\n");
    }

    #[test]
    fn test_loop_variable_is_fresh_each_iteration() {
        let (_, output) = run_ok(
            "DEF main() DO FOR i IN range(0, 3) DO LET d = i * 2; print(d); END \
             RETURN 0; END",
        );
        assert_eq!(output, "0\n2\n4\n");
    }

    #[test]
    fn test_empty_range_runs_zero_iterations() {
        let (_, output) = run_ok(
            "DEF main() DO FOR i IN range(3, 3) DO print(i); END \
             print(\"done\"); RETURN 0; END",
        );
        assert_eq!(output, "done\n");
    }

    #[test]
    fn test_recursion() {
        let (value, _) = run_ok(
            "DEF fact(n: Integer): Integer DO \
             IF n <= 1 DO RETURN 1; END RETURN n * fact(n - 1); END \
             DEF main() DO RETURN fact(10); END",
        );
        assert_eq!(value, int(3628800));
    }

    #[test]
    fn test_uninitialized_field_is_nil() {
        let (_, output) = run_ok(
            "LET x: Any; DEF main() DO print(x); RETURN 0; END",
        );
        assert_eq!(output, "nil\n");
    }

    #[test]
    fn test_print_formats_values() {
        let (_, output) = run_ok(
            "DEF main() DO print(NIL); print('c'); print(2.50); print(range(0, 2)); \
             RETURN 0; END",
        );
        assert_eq!(output, "nil\nc\n2.50\n[0, 1]\n");
    }
}
