//! Assertion primitives
//!
//! Every primitive that detects a violated expectation raises an error
//! object of kind [`ASSERTION_ERROR`]. The runner counts those raises as
//! failures and every other raise as an error.
//!
//! All primitives share one message rule: when a non-empty `message` is
//! given, `" : <message>"` is appended to the generated explanation.

use crate::error::Thrown;
use crate::namespace::Namespace;
use crate::value::{Function, Value};
use thiserror::Error;

/// Kind name carried by every assertion failure
pub const ASSERTION_ERROR: &str = "AssertionError";

/// Result of an assertion primitive
pub type AssertResult = Result<(), Thrown>;

/// A violated expectation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Recover an assertion failure from a raise, if it is one
    pub fn from_thrown(thrown: &Thrown) -> Option<Self> {
        if thrown.kind() != ASSERTION_ERROR {
            return None;
        }
        Some(Self::new(thrown.message().unwrap_or_default()))
    }
}

impl From<AssertionFailure> for Thrown {
    fn from(failure: AssertionFailure) -> Self {
        Thrown::error(ASSERTION_ERROR, failure.message)
    }
}

fn fail(explanation: String, message: Option<&str>) -> Thrown {
    let message = match message {
        Some(m) if !m.is_empty() => format!("{} : {}", explanation, m),
        _ => explanation,
    };
    AssertionFailure::new(message).into()
}

/// Succeeds iff `value` is exactly the boolean `true`
pub fn is_true(value: &Value, message: Option<&str>) -> AssertResult {
    if value.is_true() {
        return Ok(());
    }
    Err(fail(format!("Expected true, actually '{}'", value), message))
}

/// Succeeds iff `expected` and `actual` are strictly equal
pub fn is_equal(expected: &Value, actual: &Value, message: Option<&str>) -> AssertResult {
    if expected.strict_equals(actual) {
        return Ok(());
    }
    Err(fail(
        format!("Expected '{}', actually '{}'", expected, actual),
        message,
    ))
}

/// Succeeds iff calling `block` raises, and the raise is of `expected_kind` when given
///
/// `block` is called exactly once. A matching raise is absorbed.
pub fn throws_error(
    block: &Function,
    expected_kind: Option<&str>,
    message: Option<&str>,
) -> AssertResult {
    let exception = match block.call(&[]) {
        Ok(_) => return Err(fail("Expected exception".to_string(), message)),
        Err(thrown) => thrown,
    };

    if let Some(kind) = expected_kind {
        if !exception.is_kind(kind) {
            return Err(fail(
                format!(
                    "Expected exception type '{}', actually '{}'",
                    kind, exception
                ),
                message,
            ));
        }
    }

    Ok(())
}

/// The assertion primitives as a script-visible module
///
/// Missing arguments read as `undefined`. A falsy message appends nothing.
/// The expected kind of `throwsError` is a kind name, or a function whose
/// name is the kind.
pub fn module() -> Namespace {
    Namespace::new()
        .with(
            "isTrue",
            Value::native("isTrue", |args| {
                is_true(&arg(args, 0), message_arg(args, 1).as_deref())?;
                Ok(Value::Undefined)
            }),
        )
        .with(
            "isEqual",
            Value::native("isEqual", |args| {
                is_equal(&arg(args, 0), &arg(args, 1), message_arg(args, 2).as_deref())?;
                Ok(Value::Undefined)
            }),
        )
        .with(
            "throwsError",
            Value::native("throwsError", |args| {
                let block = match arg(args, 0) {
                    Value::Function(func) => func,
                    other => {
                        return Err(Thrown::type_error(format!(
                            "throwsError expects a function, got {}",
                            other.type_name()
                        )))
                    }
                };
                let kind = kind_arg(args, 1)?;
                throws_error(&block, kind.as_deref(), message_arg(args, 2).as_deref())?;
                Ok(Value::Undefined)
            }),
        )
        .with("AssertionError", ASSERTION_ERROR)
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn message_arg(args: &[Value], index: usize) -> Option<String> {
    let message = arg(args, index);
    message.is_truthy().then(|| message.to_string())
}

fn kind_arg(args: &[Value], index: usize) -> Result<Option<String>, Thrown> {
    match arg(args, index) {
        Value::Undefined => Ok(None),
        Value::String(kind) => Ok(Some(kind.to_string())),
        Value::Function(func) => Ok(Some(func.name().to_string())),
        other => Err(Thrown::type_error(format!(
            "expected exception kind must be a name or a function, got {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn failure_message(result: AssertResult) -> String {
        let thrown = result.expect_err("assertion should fail");
        assert_eq!(thrown.kind(), ASSERTION_ERROR);
        thrown.message().unwrap().to_string()
    }

    fn raising(thrown: Thrown) -> Function {
        Function::new("block", move |_| Err(thrown.clone()))
    }

    #[rstest]
    #[case(Value::Number(1.0), "Expected true, actually '1'")]
    #[case(Value::from("true"), "Expected true, actually 'true'")]
    #[case(Value::Bool(false), "Expected true, actually 'false'")]
    #[case(Value::Undefined, "Expected true, actually 'undefined'")]
    fn test_is_true_rejects(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(failure_message(is_true(&value, None)), expected);
    }

    #[test]
    fn test_is_true_accepts_true() {
        assert!(is_true(&Value::Bool(true), Some("unused")).is_ok());
    }

    #[rstest]
    #[case(None, "Expected true, actually 'false'")]
    #[case(Some(""), "Expected true, actually 'false'")]
    #[case(Some("flag"), "Expected true, actually 'false' : flag")]
    fn test_message_suffix(#[case] message: Option<&str>, #[case] expected: &str) {
        assert_eq!(failure_message(is_true(&Value::Bool(false), message)), expected);
    }

    #[test]
    fn test_is_equal() {
        assert!(is_equal(&Value::from(3), &Value::Number(3.0), None).is_ok());
        assert_eq!(
            failure_message(is_equal(&Value::from(3), &Value::from("3"), Some("sum"))),
            "Expected '3', actually '3' : sum"
        );
    }

    #[test]
    fn test_throws_error_without_raise() {
        let block = Function::new("quiet", |_| Ok(Value::Undefined));
        assert_eq!(
            failure_message(throws_error(&block, None, Some("must raise"))),
            "Expected exception : must raise"
        );
    }

    #[test]
    fn test_throws_error_absorbs_any_raise() {
        assert!(throws_error(&raising(Thrown::new("oops")), None, None).is_ok());
        assert!(throws_error(&raising(Thrown::type_error("x")), None, None).is_ok());
    }

    #[test]
    fn test_throws_error_kind_mismatch() {
        let block = raising(Thrown::type_error("bad"));
        assert_eq!(
            failure_message(throws_error(&block, Some("RangeError"), None)),
            "Expected exception type 'RangeError', actually 'TypeError: bad'"
        );
        assert!(throws_error(&block, Some("TypeError"), None).is_ok());
        assert!(throws_error(&block, Some("Error"), None).is_ok());
    }

    #[test]
    fn test_throws_error_primitive_never_matches_kind() {
        let block = raising(Thrown::new("oops"));
        assert_eq!(
            failure_message(throws_error(&block, Some("Error"), None)),
            "Expected exception type 'Error', actually 'oops'"
        );
    }

    #[test]
    fn test_throws_error_calls_block_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let block = Function::new("counted", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Thrown::new("boom"))
        });

        throws_error(&block, Some("RangeError"), None).unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_round_trips_through_thrown() {
        let thrown: Thrown = AssertionFailure::new("nope").into();
        assert_eq!(thrown.to_string(), "AssertionError: nope");
        assert_eq!(
            AssertionFailure::from_thrown(&thrown),
            Some(AssertionFailure::new("nope"))
        );
        assert_eq!(AssertionFailure::from_thrown(&Thrown::new("nope")), None);
    }

    #[test]
    fn test_module_functions() {
        let assert = module();
        let is_true = assert.get("isTrue").and_then(Value::as_function).unwrap();
        let is_equal = assert.get("isEqual").and_then(Value::as_function).unwrap();

        assert!(is_true.call(&[Value::Bool(true)]).is_ok());
        let thrown = is_true.call(&[]).unwrap_err();
        assert_eq!(
            thrown.to_string(),
            "AssertionError: Expected true, actually 'undefined'"
        );

        let thrown = is_equal
            .call(&[Value::from(1), Value::from(2), Value::from(0)])
            .unwrap_err();
        assert_eq!(thrown.message(), Some("Expected '1', actually '2'"));
    }

    #[test]
    fn test_module_throws_error_kind_from_function_name() {
        let assert = module();
        let throws = assert.get("throwsError").and_then(Value::as_function).unwrap();
        let block = Value::native("block", |_| Err(Thrown::type_error("bad")));
        let kind = Value::native("TypeError", |_| Ok(Value::Undefined));

        assert!(throws.call(&[block.clone(), kind]).is_ok());
        assert!(throws.call(&[block, Value::from("TypeError")]).is_ok());

        let thrown = throws.call(&[Value::from(1)]).unwrap_err();
        assert_eq!(thrown.kind(), "TypeError");
    }
}
