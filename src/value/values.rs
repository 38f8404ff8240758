use std::fmt::{Display, Formatter};

use super::{BoundFunction, Closure};
use crate::DynObject;

/// Everything a member slot can hold.
///
/// `Closure` is a bare callable that has not been attached to an object yet;
/// storing one through [`DynObject::set`] turns it into a `Function`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(isize),
    Float(f64),
    Str(String),
    Object(DynObject),
    Closure(Closure),
    Function(BoundFunction),
}

impl Value {
    /// Wrap a native closure so it can be assigned as a method
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&DynObject, &[Value]) -> crate::ObjectResult<Value> + 'static,
    {
        Value::Closure(Closure::new(f))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Loose truthiness: nil, false, zero and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Object(_) | Value::Closure(_) | Value::Function(_) => true,
        }
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Closure(_) => "closure",
            Value::Function(_) => "function",
        }
    }

    pub fn as_object(&self) -> Option<&DynObject> {
        if let Value::Object(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    pub fn as_function(&self) -> Option<&BoundFunction> {
        if let Value::Function(func) = self {
            Some(func)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(x) => x.fmt(f),
            Value::Int(x) => x.fmt(f),
            Value::Float(x) => x.fmt(f),
            Value::Str(x) => x.fmt(f),
            Value::Object(obj) => obj.fmt(f),
            Value::Closure(_) => write!(f, "#Closure"),
            Value::Function(func) => func.fmt(f),
        }
    }
}
