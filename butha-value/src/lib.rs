//! Runtime values and scopes of the Butha language.

pub mod builtins;
pub mod error;
pub mod object;
pub mod scope;

use std::fmt;
use std::rc::Rc;

use butha_parser::ast::Literal;

pub use builtins::BuiltinVars;
pub use error::EvalError;
pub use object::{Function, NativeFn};
pub use scope::{Scope, ScopeRef};

#[derive(Clone)]
pub enum Value {
    Number(f64),
    Str(Rc<str>),
    Bool(bool),
    Function(Rc<Function>),
    NativeFn(Rc<NativeFn>),
    /// The value of a statement that produced nothing and of parameters without an argument.
    Absent,
}

impl Value {
    pub fn string(val: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(val.as_ref()))
    }

    /// `false`, `0`, `NaN`, `""` and absent are falsy. Everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(val) => *val != 0.0 && !val.is_nan(),
            Value::Str(val) => !val.is_empty(),
            Value::Bool(val) => *val,
            Value::Function(_) | Value::NativeFn(_) => true,
            Value::Absent => false,
        }
    }

    /// Numeric view of the value: numbers as is, booleans as `1` and `0`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(val) => Some(*val),
            Value::Bool(val) => Some(if *val { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Attempts to cast the `Value` into a `&str` or `None` if wrong type.
    pub fn cast_to_str(&self) -> Option<&str> {
        match self {
            Value::Str(val) => Some(val),
            _ => None,
        }
    }

    /// A copy that keeps the scope of a weakly bound function alive.
    /// Values leaving a scope go through this so they cannot outlive what they refer to.
    pub fn to_strong(&self) -> Value {
        match self {
            Value::Function(func) if func.is_weak() => match func.upgrade() {
                Some(func) => Value::Function(Rc::new(func)),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Function(_) | Value::NativeFn(_) => "function",
            Value::Absent => "undefined",
        }
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Number(val)
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::string(val)
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(val) => Value::Number(*val),
            Literal::String(val) => Value::string(val),
            Literal::Bool(val) => Value::Bool(*val),
            Literal::Null => Value::Absent,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            // functions compare by declaration and scope
            (Value::Function(l), Value::Function(r)) => l.same_as(r),
            (Value::NativeFn(l), Value::NativeFn(r)) => Rc::ptr_eq(l, r),
            (Value::Absent, Value::Absent) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(val) => write!(f, "{}", val),
            Value::Str(val) => write!(f, "{}", val),
            Value::Bool(val) => write!(f, "{}", val),
            Value::Function(func) => write!(f, "<fn {}>", func.ident),
            Value::NativeFn(native) => write!(f, "<native fn {}>", native.ident),
            Value::Absent => write!(f, "undefined"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(val) => write!(f, "{:?}", val),
            _ => fmt::Display::fmt(self, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("0").is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Absent.is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(format!("{:?}", Value::string("hi")), "\"hi\"");
        assert_eq!(Value::Absent.to_string(), "undefined");
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(Value::Bool(true).to_number(), Some(1.0));
        assert_eq!(Value::Number(3.0).to_number(), Some(3.0));
        assert_eq!(Value::string("3").to_number(), None);
        assert_eq!(Value::Absent.to_number(), None);
    }

    #[test]
    fn test_from_literal() {
        assert_eq!(Value::from(&Literal::Null), Value::Absent);
        assert_eq!(Value::from(&Literal::String("a".into())), Value::string("a"));
        assert_eq!(Value::from(&Literal::Number(1.0)), Value::Number(1.0));
    }
}
