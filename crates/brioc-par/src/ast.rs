//! AST node definitions.
//!
//! Two groups: expressions and statements, plus the `Field` / `Method`
//! / `Source` top level. Every expression carries a slot for its
//! resolved [`Type`], and every name-bearing node a slot for its bound
//! symbol; both start empty and are populated by the analyzer. Each
//! node records the byte offset of its first token so later phases can
//! position their errors.

use bigdecimal::BigDecimal;
use brioc_env::{FunctionSig, Type, Variable};
use num_bigint::BigInt;

/// A literal value, numeric forms kept at full precision.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Nil,
    Boolean(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    And,
    Or,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Maps an operator's source text to the operator.
    pub fn from_literal(literal: &str) -> Option<BinOp> {
        match literal {
            "AND" => Some(BinOp::And),
            "OR" => Some(BinOp::Or),
            "<" => Some(BinOp::Lt),
            "<=" => Some(BinOp::Le),
            ">" => Some(BinOp::Gt),
            ">=" => Some(BinOp::Ge),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::Ne),
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            _ => None,
        }
    }

    /// The operator's source text.
    pub fn literal(&self) -> &'static str {
        match self {
            BinOp::And => "AND",
            BinOp::Or => "OR",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// An expression node with its annotation slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,

    /// Byte offset of the expression's first token.
    pub index: usize,

    /// Resolved type, filled by the analyzer.
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, index: usize) -> Self {
        Self {
            kind,
            index,
            ty: None,
        }
    }
}

/// The expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(LiteralValue),

    /// Parenthesized subexpression. Semantically transparent, but kept
    /// in the tree to preserve source structure; the analyzer restricts
    /// what may appear inside.
    Group(Box<Expr>),

    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Access(Access),

    Call(Call),
}

/// A variable or field read, optionally through a receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct Access {
    pub receiver: Option<Box<Expr>>,
    pub name: String,

    /// Bound symbol, filled by the analyzer.
    pub binding: Option<Variable>,
}

/// A free-function or method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    pub args: Vec<Expr>,

    /// Bound signature, filled by the analyzer.
    pub binding: Option<FunctionSig>,
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,

    /// Byte offset of the statement's first token.
    pub index: usize,
}

impl Stmt {
    pub fn new(kind: StmtKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// The statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// An expression evaluated for effect; the analyzer requires it to
    /// be a call.
    Expression(Expr),

    Declaration(Declaration),

    Assignment { receiver: Expr, value: Expr },

    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },

    For {
        name: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },

    While { condition: Expr, body: Vec<Stmt> },

    Return { value: Expr },
}

/// A local declaration: `LET name (: Type)? (= value)? ;`
///
/// The analyzer requires at least one of the type annotation and the
/// initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expr>,

    /// Bound symbol, filled by the analyzer.
    pub binding: Option<Variable>,
}

/// A top-level field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expr>,
    pub index: usize,

    /// Bound symbol, filled by the analyzer.
    pub binding: Option<Variable>,
}

/// A method definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub params: Vec<String>,

    /// Declared parameter types, `None` meaning `Any`.
    pub param_type_names: Vec<Option<String>>,

    /// Declared return type, `None` meaning `Any` (`Integer` for
    /// `main`).
    pub return_type_name: Option<String>,

    pub body: Vec<Stmt>,
    pub index: usize,

    /// Bound signature, filled by the analyzer.
    pub binding: Option<FunctionSig>,
}

/// A whole source file: fields first, then methods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Source {
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}
