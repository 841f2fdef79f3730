//! The analyzer: name resolution and type checking.

use brioc_env::{builtins, FunctionSig, ScopeTree, Type, Variable};
use brioc_par::{
    BinOp, Expr, ExprKind, Field, LiteralValue, Method, Source, Stmt, StmtKind,
};
use brioc_util::AnalysisError;
use num_traits::ToPrimitive;

/// Pseudo-variable carrying the enclosing method's declared return
/// type; installed in every method-body scope.
const RETURN_TYPE: &str = "returnType";

/// Semantic analyzer.
///
/// Owns the scope tree it resolves against. The built-in bindings are
/// installed in the root scope on construction.
pub struct Analyzer {
    scopes: ScopeTree<Variable, FunctionSig>,
}

impl Analyzer {
    pub fn new() -> Self {
        let mut scopes = ScopeTree::new();
        builtins::install_builtins(&mut scopes);
        Self { scopes }
    }

    /// Analyzes a whole source tree: fields, then methods, then the
    /// `main` rule.
    pub fn analyze_source(&mut self, source: &mut Source) -> Result<(), AnalysisError> {
        for field in &mut source.fields {
            self.analyze_field(field)?;
        }
        for method in &mut source.methods {
            self.analyze_method(method)?;
        }

        let main = self.scopes.lookup_function("main", 0).ok_or_else(|| {
            AnalysisError::unpositioned("program requires a 'main' method taking no arguments")
        })?;
        if main.return_type != Type::Integer {
            return Err(AnalysisError::unpositioned(format!(
                "'main' must return Integer, not {}",
                main.return_type
            )));
        }
        Ok(())
    }

    fn analyze_field(&mut self, field: &mut Field) -> Result<(), AnalysisError> {
        let variable = self.declare(
            &field.name,
            field.type_name.as_deref(),
            field.value.as_mut(),
            field.index,
        )?;
        field.binding = Some(variable);
        Ok(())
    }

    fn analyze_method(&mut self, method: &mut Method) -> Result<(), AnalysisError> {
        let mut parameter_types = Vec::with_capacity(method.params.len());
        for type_name in &method.param_type_names {
            parameter_types.push(match type_name {
                Some(name) => self.resolve_type(name, method.index)?,
                None => Type::Any,
            });
        }

        // An unannotated return type is Any, except for main/0 whose
        // contract is to produce the program's Integer exit value.
        let return_type = match &method.return_type_name {
            Some(name) => self.resolve_type(name, method.index)?,
            None if method.name == "main" && method.params.is_empty() => Type::Integer,
            None => Type::Any,
        };

        let sig = FunctionSig::new(method.name.clone(), parameter_types.clone(), return_type);
        if self
            .scopes
            .define_function(method.name.clone(), method.params.len(), sig.clone())
            .is_some()
        {
            return Err(AnalysisError::new(
                format!(
                    "method '{}/{}' is already defined",
                    method.name,
                    method.params.len()
                ),
                method.index,
            ));
        }
        method.binding = Some(sig);

        let index = method.index;
        let params: Vec<(String, Type)> = method
            .params
            .iter()
            .cloned()
            .zip(parameter_types)
            .collect();
        self.in_child_scope(|this| {
            for (param, ty) in &params {
                if this
                    .scopes
                    .define_variable(param.clone(), Variable::new(param.clone(), *ty))
                    .is_some()
                {
                    return Err(AnalysisError::new(
                        format!("duplicate parameter '{}'", param),
                        index,
                    ));
                }
            }
            this.scopes
                .define_variable(RETURN_TYPE, Variable::new(RETURN_TYPE, return_type));
            for stmt in &mut method.body {
                this.analyze_stmt(stmt)?;
            }
            Ok(())
        })
    }

    fn analyze_stmt(&mut self, stmt: &mut Stmt) -> Result<(), AnalysisError> {
        let index = stmt.index;
        match &mut stmt.kind {
            StmtKind::Expression(expr) => {
                if !matches!(expr.kind, ExprKind::Call(_)) {
                    return Err(AnalysisError::new(
                        "expression statements must be calls",
                        index,
                    ));
                }
                self.analyze_expr(expr)?;
                Ok(())
            }

            StmtKind::Declaration(decl) => {
                let variable = self.declare(
                    &decl.name,
                    decl.type_name.as_deref(),
                    decl.value.as_mut(),
                    index,
                )?;
                decl.binding = Some(variable);
                Ok(())
            }

            StmtKind::Assignment { receiver, value } => {
                if !matches!(receiver.kind, ExprKind::Access(_)) {
                    return Err(AnalysisError::new(
                        "assignment target must be an access expression",
                        index,
                    ));
                }
                let target = self.analyze_expr(receiver)?;
                let actual = self.analyze_expr(value)?;
                self.require_assignable(target, actual, value.index)
            }

            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                let cond = self.analyze_expr(condition)?;
                if cond != Type::Boolean {
                    return Err(AnalysisError::new(
                        format!("IF condition must be Boolean, not {}", cond),
                        condition.index,
                    ));
                }
                if then_body.is_empty() {
                    return Err(AnalysisError::new(
                        "IF statement requires a non-empty THEN branch",
                        index,
                    ));
                }
                self.in_child_scope(|this| {
                    for stmt in then_body.iter_mut() {
                        this.analyze_stmt(stmt)?;
                    }
                    Ok(())
                })?;
                self.in_child_scope(|this| {
                    for stmt in else_body.iter_mut() {
                        this.analyze_stmt(stmt)?;
                    }
                    Ok(())
                })
            }

            StmtKind::For {
                name,
                iterable,
                body,
            } => {
                let iterable_ty = self.analyze_expr(iterable)?;
                self.require_assignable(Type::IntegerIterable, iterable_ty, iterable.index)?;
                if body.is_empty() {
                    return Err(AnalysisError::new(
                        "FOR statement requires a non-empty body",
                        index,
                    ));
                }
                let name = name.clone();
                self.in_child_scope(|this| {
                    this.scopes
                        .define_variable(name.clone(), Variable::new(name, Type::Integer));
                    for stmt in body.iter_mut() {
                        this.analyze_stmt(stmt)?;
                    }
                    Ok(())
                })
            }

            StmtKind::While { condition, body } => {
                let cond = self.analyze_expr(condition)?;
                if cond != Type::Boolean {
                    return Err(AnalysisError::new(
                        format!("WHILE condition must be Boolean, not {}", cond),
                        condition.index,
                    ));
                }
                self.in_child_scope(|this| {
                    for stmt in body.iter_mut() {
                        this.analyze_stmt(stmt)?;
                    }
                    Ok(())
                })
            }

            StmtKind::Return { value } => {
                let actual = self.analyze_expr(value)?;
                let declared = self
                    .scopes
                    .lookup_variable(RETURN_TYPE)
                    .map(|v| v.ty)
                    .ok_or_else(|| AnalysisError::new("RETURN outside of a method", index))?;
                self.require_assignable(declared, actual, value.index)
            }
        }
    }

    /// Analyzes an expression, storing and returning its type.
    fn analyze_expr(&mut self, expr: &mut Expr) -> Result<Type, AnalysisError> {
        let index = expr.index;
        let ty = match &mut expr.kind {
            ExprKind::Literal(value) => literal_type(value, index)?,

            ExprKind::Group(inner) => {
                if !matches!(inner.kind, ExprKind::Binary { .. }) {
                    return Err(AnalysisError::new(
                        "grouped expression must be a binary expression",
                        index,
                    ));
                }
                self.analyze_expr(inner)?
            }

            ExprKind::Binary { op, left, right } => {
                let op = *op;
                let left_ty = self.analyze_expr(left)?;
                let right_ty = self.analyze_expr(right)?;
                match op {
                    BinOp::And | BinOp::Or => {
                        if left_ty != Type::Boolean || right_ty != Type::Boolean {
                            return Err(AnalysisError::new(
                                format!(
                                    "operands of '{}' must be Boolean, found {} and {}",
                                    op.literal(),
                                    left_ty,
                                    right_ty
                                ),
                                index,
                            ));
                        }
                        Type::Boolean
                    }
                    BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne => {
                        self.require_assignable(Type::Comparable, left_ty, left.index)?;
                        self.require_assignable(Type::Comparable, right_ty, right.index)?;
                        Type::Boolean
                    }
                    BinOp::Add => {
                        if left_ty == Type::String || right_ty == Type::String {
                            Type::String
                        } else {
                            numeric_result(op, left_ty, right_ty, index)?
                        }
                    }
                    BinOp::Sub | BinOp::Mul | BinOp::Div => {
                        numeric_result(op, left_ty, right_ty, index)?
                    }
                }
            }

            ExprKind::Access(access) => match &mut access.receiver {
                Some(receiver) => {
                    let receiver_ty = self.analyze_expr(receiver)?;
                    let variable = receiver_ty.field(&access.name).ok_or_else(|| {
                        AnalysisError::new(
                            format!("type {} has no field '{}'", receiver_ty, access.name),
                            index,
                        )
                    })?;
                    let ty = variable.ty;
                    access.binding = Some(variable);
                    ty
                }
                None => {
                    let variable = self
                        .scopes
                        .lookup_variable(&access.name)
                        .cloned()
                        .ok_or_else(|| {
                            AnalysisError::new(
                                format!("variable '{}' is not defined", access.name),
                                index,
                            )
                        })?;
                    let ty = variable.ty;
                    access.binding = Some(variable);
                    ty
                }
            },

            ExprKind::Call(call) => {
                let sig = match &mut call.receiver {
                    Some(receiver) => {
                        let receiver_ty = self.analyze_expr(receiver)?;
                        receiver_ty
                            .method(&call.name, call.args.len())
                            .ok_or_else(|| {
                                AnalysisError::new(
                                    format!(
                                        "type {} has no method '{}/{}'",
                                        receiver_ty,
                                        call.name,
                                        call.args.len()
                                    ),
                                    index,
                                )
                            })?
                    }
                    None => self
                        .scopes
                        .lookup_function(&call.name, call.args.len())
                        .cloned()
                        .ok_or_else(|| {
                            AnalysisError::new(
                                format!(
                                    "function '{}/{}' is not defined",
                                    call.name,
                                    call.args.len()
                                ),
                                index,
                            )
                        })?,
                };
                let parameter_types = sig.parameter_types.clone();
                for (arg, param_ty) in call.args.iter_mut().zip(parameter_types) {
                    let arg_ty = self.analyze_expr(arg)?;
                    self.require_assignable(param_ty, arg_ty, arg.index)?;
                }
                let ty = sig.return_type;
                call.binding = Some(sig);
                ty
            }
        };

        expr.ty = Some(ty);
        Ok(ty)
    }

    /// Shared handling for fields and local declarations.
    ///
    /// The declared type is the annotation when present, otherwise the
    /// initializer's type; having neither is an error.
    fn declare(
        &mut self,
        name: &str,
        type_name: Option<&str>,
        value: Option<&mut Expr>,
        index: usize,
    ) -> Result<Variable, AnalysisError> {
        let annotated = match type_name {
            Some(name) => Some(self.resolve_type(name, index)?),
            None => None,
        };
        let value_ty = match value {
            Some(expr) => Some(self.analyze_expr(expr)?),
            None => None,
        };
        let ty = match (annotated, value_ty) {
            (Some(target), Some(actual)) => {
                self.require_assignable(target, actual, index)?;
                target
            }
            (Some(target), None) => target,
            (None, Some(actual)) => actual,
            (None, None) => {
                return Err(AnalysisError::new(
                    format!(
                        "declaration of '{}' needs a type annotation or an initializer",
                        name
                    ),
                    index,
                ))
            }
        };

        let variable = Variable::new(name, ty);
        if self
            .scopes
            .define_variable(name, variable.clone())
            .is_some()
        {
            return Err(AnalysisError::new(
                format!("'{}' is already defined in this scope", name),
                index,
            ));
        }
        Ok(variable)
    }

    /// Succeeds iff `actual` may be used where `target` is expected:
    /// the types match, the target is `Any`, or the target is
    /// `Comparable` and the actual type is one of the four ordered
    /// types.
    fn require_assignable(
        &self,
        target: Type,
        actual: Type,
        index: usize,
    ) -> Result<(), AnalysisError> {
        let ok = target == actual
            || target == Type::Any
            || (target == Type::Comparable
                && matches!(
                    actual,
                    Type::Integer | Type::Decimal | Type::Character | Type::String
                ));
        if ok {
            Ok(())
        } else {
            Err(AnalysisError::new(
                format!("expected type {}, found {}", target, actual),
                index,
            ))
        }
    }

    fn resolve_type(&self, name: &str, index: usize) -> Result<Type, AnalysisError> {
        Type::from_name(name)
            .ok_or_else(|| AnalysisError::new(format!("unknown type '{}'", name), index))
    }

    /// Runs `f` in a fresh child scope, restoring the previous scope on
    /// every exit path.
    fn in_child_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, AnalysisError>,
    ) -> Result<T, AnalysisError> {
        let prev = self.scopes.current();
        self.scopes.enter();
        let result = f(self);
        self.scopes.exit_to(prev);
        result
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// The type of a literal, enforcing the numeric range constraints.
fn literal_type(value: &LiteralValue, index: usize) -> Result<Type, AnalysisError> {
    Ok(match value {
        LiteralValue::Nil => Type::Nil,
        LiteralValue::Boolean(_) => Type::Boolean,
        LiteralValue::Character(_) => Type::Character,
        LiteralValue::String(_) => Type::String,
        LiteralValue::Integer(n) => {
            if n.to_i32().is_none() {
                return Err(AnalysisError::new(
                    format!("integer literal {} does not fit 32-bit signed range", n),
                    index,
                ));
            }
            Type::Integer
        }
        LiteralValue::Decimal(d) => {
            if !d.to_f64().map(f64::is_finite).unwrap_or(false) {
                return Err(AnalysisError::new(
                    format!("decimal literal {} exceeds double magnitude", d),
                    index,
                ));
            }
            Type::Decimal
        }
    })
}

fn numeric_result(
    op: BinOp,
    left: Type,
    right: Type,
    index: usize,
) -> Result<Type, AnalysisError> {
    match (left, right) {
        (Type::Integer, Type::Integer) => Ok(Type::Integer),
        (Type::Decimal, Type::Decimal) => Ok(Type::Decimal),
        _ => Err(AnalysisError::new(
            format!(
                "operands of '{}' must both be Integer or both be Decimal, found {} and {}",
                op.literal(),
                left,
                right
            ),
            index,
        )),
    }
}
