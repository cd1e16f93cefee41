//! Raised values and fatal runner errors

use crate::value::{ErrorObject, Value};
use std::fmt;
use thiserror::Error;

/// A raised value
///
/// Anything can be raised: an error object, a plain string, a number.
/// Callables report a raise by returning `Err(Thrown)`.
#[derive(Debug, Clone)]
pub struct Thrown {
    value: Value,
}

impl Thrown {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Raise an error object of the given kind
    pub fn error(name: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorObject::new(name, message.into()))
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::error("TypeError", message)
    }

    /// Kind name: the error object's name, or the type name of a primitive
    pub fn kind(&self) -> &str {
        match &self.value {
            Value::Error(err) => err.name(),
            other => other.type_name(),
        }
    }

    /// Whether this raise is an error object of `kind`
    ///
    /// Primitive raises match no kind.
    pub fn is_kind(&self, kind: &str) -> bool {
        match &self.value {
            Value::Error(err) => err.is_kind(kind),
            _ => false,
        }
    }

    /// Message of an error object; `None` for primitive raises
    pub fn message(&self) -> Option<&str> {
        match &self.value {
            Value::Error(err) => Some(err.message()),
            _ => None,
        }
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::error::Error for Thrown {}

/// Module resolution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Cannot find module '{name}'")]
    UnknownModule { name: String },
}

/// Structural failures that abort a run
///
/// Per-test raises never surface here; they are counted in the run context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("Nothing to run")]
    NothingToRun,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Module '{name}' is not a namespace")]
    NotANamespace { name: String },

    /// A unit reaches itself through its own suite members
    #[error("Unit '{name}' includes itself")]
    Cycle { name: String },
}

/// Result type for runner operations
pub type RunResult<T> = Result<T, RunError>;
