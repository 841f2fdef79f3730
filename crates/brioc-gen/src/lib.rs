//! brioc-gen - Java source generator for the Brio language.
//!
//! The generator is the second consumer of the analyzed AST: it emits
//! an equivalent Java class to an abstract text sink owned by the
//! caller. Output layout is deterministic: 4-space indentation,
//! incremented on block entry and decremented on exit, with no
//! trailing whitespace on any line.
//!
//! A `Source` becomes a `public class Main` holding each field, a
//! bootstrap `main(String[] args)` that runs
//! `System.exit(new Main().main());`, and one Java method per user
//! method. Names and types come from the symbols the analyzer bound
//! onto the tree (`jvm_name` / `jvm_name()`), which is why generating
//! from an unanalyzed tree is an error, not a panic.

use std::fmt::{self, Write};

use brioc_env::jvm_name;
use brioc_par::{BinOp, Expr, ExprKind, Field, LiteralValue, Method, Source, Stmt, StmtKind};
use thiserror::Error;

/// Generator failure.
#[derive(Debug, Error)]
pub enum GenError {
    /// The sink refused a write.
    #[error("failed writing to sink: {0}")]
    Fmt(#[from] fmt::Error),

    /// A node was missing its analyzer annotation.
    #[error("cannot generate from an unanalyzed tree: {0} has no binding")]
    Unannotated(String),
}

/// Generates Java source for an analyzed tree into `sink`.
///
/// Convenience wrapper over [`Generator`].
pub fn generate(source: &Source, sink: &mut dyn Write) -> Result<(), GenError> {
    Generator::new(sink).source(source)
}

/// Java text emitter with indentation tracking.
pub struct Generator<'a> {
    out: &'a mut dyn Write,
    indent: usize,
}

impl<'a> Generator<'a> {
    /// Creates a generator writing to the given sink.
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out, indent: 0 }
    }

    /// Emits the whole class.
    pub fn source(&mut self, source: &Source) -> Result<(), GenError> {
        self.line("public class Main {")?;
        self.indent += 1;
        self.line("")?;

        for field in &source.fields {
            let text = field_text(field)?;
            self.line(&text)?;
        }
        if !source.fields.is_empty() {
            self.line("")?;
        }

        self.line("public static void main(String[] args) {")?;
        self.indent += 1;
        self.line("System.exit(new Main().main());")?;
        self.indent -= 1;
        self.line("}")?;
        self.line("")?;

        for (i, method) in source.methods.iter().enumerate() {
            if i > 0 {
                self.line("")?;
            }
            self.method(method)?;
        }

        self.indent -= 1;
        self.line("")?;
        self.line("}")?;
        Ok(())
    }

    fn method(&mut self, method: &Method) -> Result<(), GenError> {
        let sig = method
            .binding
            .as_ref()
            .ok_or_else(|| GenError::Unannotated(format!("method '{}'", method.name)))?;

        let mut header = String::new();
        write!(header, "{} {}(", sig.return_type.jvm_name(), sig.jvm_name)?;
        for (i, (param, ty)) in method.params.iter().zip(&sig.parameter_types).enumerate() {
            if i > 0 {
                header.push_str(", ");
            }
            write!(header, "{} {}", ty.jvm_name(), jvm_name(param))?;
        }
        header.push_str(") {");
        self.line(&header)?;

        self.indent += 1;
        for stmt in &method.body {
            self.stmt(stmt)?;
        }
        self.indent -= 1;
        self.line("}")
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), GenError> {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                let text = format!("{};", expr_text(expr)?);
                self.line(&text)
            }

            StmtKind::Declaration(decl) => {
                let variable = decl
                    .binding
                    .as_ref()
                    .ok_or_else(|| GenError::Unannotated(format!("declaration '{}'", decl.name)))?;
                let text = match &decl.value {
                    Some(value) => format!(
                        "{} {} = {};",
                        variable.ty.jvm_name(),
                        variable.jvm_name,
                        expr_text(value)?
                    ),
                    None => format!("{} {};", variable.ty.jvm_name(), variable.jvm_name),
                };
                self.line(&text)
            }

            StmtKind::Assignment { receiver, value } => {
                let text = format!("{} = {};", expr_text(receiver)?, expr_text(value)?);
                self.line(&text)
            }

            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                let header = format!("if ({}) {{", expr_text(condition)?);
                self.line(&header)?;
                self.indent += 1;
                for stmt in then_body {
                    self.stmt(stmt)?;
                }
                self.indent -= 1;
                if else_body.is_empty() {
                    self.line("}")
                } else {
                    self.line("} else {")?;
                    self.indent += 1;
                    for stmt in else_body {
                        self.stmt(stmt)?;
                    }
                    self.indent -= 1;
                    self.line("}")
                }
            }

            StmtKind::For {
                name,
                iterable,
                body,
            } => {
                let header = format!("for (int {} : {}) {{", jvm_name(name), expr_text(iterable)?);
                self.line(&header)?;
                self.indent += 1;
                for stmt in body {
                    self.stmt(stmt)?;
                }
                self.indent -= 1;
                self.line("}")
            }

            StmtKind::While { condition, body } => {
                let header = format!("while ({}) {{", expr_text(condition)?);
                self.line(&header)?;
                self.indent += 1;
                for stmt in body {
                    self.stmt(stmt)?;
                }
                self.indent -= 1;
                self.line("}")
            }

            StmtKind::Return { value } => {
                let text = format!("return {};", expr_text(value)?);
                self.line(&text)
            }
        }
    }

    /// Writes one line at the current indentation. Blank lines carry
    /// no indentation so the output never has trailing whitespace.
    fn line(&mut self, text: &str) -> Result<(), GenError> {
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.write_str("    ")?;
            }
            self.out.write_str(text)?;
        }
        self.out.write_char('\n')?;
        Ok(())
    }
}

fn field_text(field: &Field) -> Result<String, GenError> {
    let variable = field
        .binding
        .as_ref()
        .ok_or_else(|| GenError::Unannotated(format!("field '{}'", field.name)))?;
    Ok(match &field.value {
        Some(value) => format!(
            "{} {} = {};",
            variable.ty.jvm_name(),
            variable.jvm_name,
            expr_text(value)?
        ),
        None => format!("{} {};", variable.ty.jvm_name(), variable.jvm_name),
    })
}

fn expr_text(expr: &Expr) -> Result<String, GenError> {
    Ok(match &expr.kind {
        ExprKind::Literal(literal) => literal_text(literal),

        ExprKind::Group(inner) => format!("({})", expr_text(inner)?),

        ExprKind::Binary { op, left, right } => format!(
            "{} {} {}",
            expr_text(left)?,
            java_operator(*op),
            expr_text(right)?
        ),

        ExprKind::Access(access) => {
            let variable = access
                .binding
                .as_ref()
                .ok_or_else(|| GenError::Unannotated(format!("access '{}'", access.name)))?;
            match &access.receiver {
                Some(receiver) => format!("{}.{}", expr_text(receiver)?, variable.jvm_name),
                None => variable.jvm_name.clone(),
            }
        }

        ExprKind::Call(call) => {
            let sig = call
                .binding
                .as_ref()
                .ok_or_else(|| GenError::Unannotated(format!("call '{}'", call.name)))?;
            let mut text = String::new();
            if let Some(receiver) = &call.receiver {
                write!(text, "{}.", expr_text(receiver)?)?;
            }
            write!(text, "{}(", sig.jvm_name)?;
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    text.push_str(", ");
                }
                text.push_str(&expr_text(arg)?);
            }
            text.push(')');
            text
        }
    })
}

fn java_operator(op: BinOp) -> &'static str {
    match op {
        BinOp::And => "&&",
        BinOp::Or => "||",
        other => other.literal(),
    }
}

fn literal_text(literal: &LiteralValue) -> String {
    match literal {
        LiteralValue::Nil => "null".to_string(),
        LiteralValue::Boolean(b) => b.to_string(),
        LiteralValue::Integer(n) => n.to_string(),
        LiteralValue::Decimal(d) => d.to_string(),
        LiteralValue::Character(c) => format!("'{}'", escaped(*c)),
        LiteralValue::String(s) => {
            let mut text = String::with_capacity(s.len() + 2);
            text.push('"');
            for c in s.chars() {
                text.push_str(&escaped(c));
            }
            text.push('"');
            text
        }
    }
}

/// Re-encodes a character for a Java literal.
fn escaped(c: char) -> String {
    match c {
        '\\' => "\\\\".to_string(),
        '"' => "\\\"".to_string(),
        '\'' => "\\'".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\u{0008}' => "\\b".to_string(),
        other => other.to_string(),
    }
}
