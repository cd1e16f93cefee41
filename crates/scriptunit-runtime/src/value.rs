//! Script value representation
//!
//! Values handed to the harness by the host environment:
//! - Undefined, Null, Bool, Number: immediate values
//! - String: reference-counted, immutable
//! - Function: named native closure, shared by reference
//! - Namespace: shared map of own members (see [`crate::namespace`])
//! - Error: error object carrying a kind name and a message

use crate::error::Thrown;
use crate::namespace::Namespace;
use std::fmt;
use std::sync::Arc;

/// Native closure callable from scripts
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value, Thrown> + Send + Sync>;

/// A named callable value
///
/// Clones share the same closure, so identity survives cloning.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    func: NativeFn,
}

impl Function {
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Thrown> {
        (self.func)(args)
    }

    /// Identity comparison (same underlying closure)
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

/// Error object: a raised value with a kind name and a message
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorObject {
    name: Arc<str>,
    message: Arc<str>,
}

impl ErrorObject {
    /// Kind every error object derives from
    pub const BASE_KIND: &'static str = "Error";

    pub fn new(name: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error is of `kind`, either directly or through the base kind
    pub fn is_kind(&self, kind: &str) -> bool {
        self.name.as_ref() == kind || kind == Self::BASE_KIND
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

/// Runtime value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    /// IEEE 754 double-precision number
    Number(f64),
    String(Arc<str>),
    Function(Function),
    Namespace(Namespace),
    Error(ErrorObject),
}

impl Value {
    /// Build a function value from a native closure
    pub fn native<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        Value::Function(Function::new(name, func))
    }

    /// Type name as reported by the script `typeof` operator
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Namespace(_) | Value::Error(_) => "object",
        }
    }

    /// Exactly the boolean `true`, never merely truthy
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Script truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Function(_) | Value::Namespace(_) | Value::Error(_) => true,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Value::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Strict equality: no coercion between types
    ///
    /// Functions and namespaces compare by identity. `NaN` equals itself.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Namespace(a), Value::Namespace(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(*n, f),
            Value::String(s) => write!(f, "{}", s),
            Value::Function(func) => write!(f, "function {}", func.name()),
            Value::Namespace(_) => write!(f, "[object Object]"),
            Value::Error(err) => write!(f, "{}", err),
        }
    }
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // -0 prints as 0
        write!(f, "0")
    } else if n.fract() == 0.0 {
        write!(f, "{:.0}", n)
    } else {
        write!(f, "{}", n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<Namespace> for Value {
    fn from(ns: Namespace) -> Self {
        Value::Namespace(ns)
    }
}

impl From<ErrorObject> for Value {
    fn from(err: ErrorObject) -> Self {
        Value::Error(err)
    }
}
