//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use brioc_env::Type;
use indexmap::IndexMap;
use num_bigint::BigInt;

/// A runtime value.
///
/// Numbers are arbitrary precision; the analyzer's 32-bit / double
/// constraints apply to literals only, never to computed results.
/// Objects have reference semantics: assigning a field through one
/// handle is visible through every other handle to the same object.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
    /// A finite iterable, as produced by `range`.
    List(Vec<Value>),
    Object(Rc<RefCell<RuntimeObject>>),
}

/// A runtime object: a [`Type`] paired with named fields.
///
/// Field order is preserved so display output is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeObject {
    pub ty: Type,
    pub fields: IndexMap<String, Value>,
}

impl Value {
    /// The source-level name of this value's runtime type, used in
    /// error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => Type::Nil.name(),
            Value::Boolean(_) => Type::Boolean.name(),
            Value::Integer(_) => Type::Integer.name(),
            Value::Decimal(_) => Type::Decimal.name(),
            Value::Character(_) => Type::Character.name(),
            Value::String(_) => Type::String.name(),
            Value::List(_) => Type::IntegerIterable.name(),
            Value::Object(object) => object.borrow().ty.name(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Character(c) => write!(f, "{}", c),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(object) => {
                let object = object.borrow();
                write!(f, "{} {{", object.ty.name())?;
                for (i, (name, value)) in object.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", name, value)?;
                }
                f.write_str(" }")
            }
        }
    }
}
