//! Built-in units
//!
//! Fixture units the CLI can load by name, alongside the `assert` module.

use scriptunit_runtime::assert;
use scriptunit_runtime::{ModuleRegistry, Namespace, OutputSink, Thrown, Value};
use std::sync::Arc;

/// Unit run when nothing else is selected
pub const DEFAULT_UNIT: &str = "sample";

/// Registry holding `assert` and every built-in unit
///
/// Hooks that print write to `sink`.
pub fn registry(sink: Arc<dyn OutputSink>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::with_stdlib();
    registry.register("sample", sample(sink));
    registry.register("nested", nested());
    registry
}

/// One passing, one failing and one erroring test between printing hooks
fn sample(sink: Arc<dyn OutputSink>) -> Namespace {
    let set_up_sink = sink.clone();
    let tear_down_sink = sink;

    Namespace::new()
        .with(
            "setUp",
            Value::native("setUp", move |_| {
                set_up_sink.emit("in setUp()");
                Ok(Value::Undefined)
            }),
        )
        .with(
            "tearDown",
            Value::native("tearDown", move |_| {
                tear_down_sink.emit("in tearDown()");
                Ok(Value::Undefined)
            }),
        )
        .with(
            "test_p",
            Value::native("test_p", |_| {
                assert::is_true(&Value::Bool(true), None)?;
                Ok(Value::Undefined)
            }),
        )
        .with(
            "test_f",
            Value::native("test_f", |_| {
                assert::is_true(&Value::Bool(false), None)?;
                Ok(Value::Undefined)
            }),
        )
        .with(
            "test_e",
            Value::native("test_e", |_| Err(Thrown::new("oops"))),
        )
}

/// Direct tests plus nested suites; every test passes
fn nested() -> Namespace {
    let math = Namespace::new()
        .with(
            "test_addition",
            Value::native("test_addition", |_| {
                assert::is_equal(&Value::from(4), &Value::from(2.0 + 2.0), Some("addition"))?;
                Ok(Value::Undefined)
            }),
        )
        .with(
            "test_nan_is_not_true",
            Value::native("test_nan_is_not_true", |_| {
                let nan = Value::Number(f64::NAN);
                assert::throws_error(
                    &scriptunit_runtime::Function::new("check", move |_| {
                        assert::is_true(&nan, None)?;
                        Ok(Value::Undefined)
                    }),
                    Some(assert::ASSERTION_ERROR),
                    None,
                )?;
                Ok(Value::Undefined)
            }),
        );

    let strings = Namespace::new()
        .with(
            "setUp",
            Value::native("setUp", |_| Ok(Value::Undefined)),
        )
        .with(
            "test_concat",
            Value::native("test_concat", |_| {
                let joined = format!("{}{}", "a", "b");
                assert::is_equal(&Value::from("ab"), &Value::from(joined), None)?;
                Ok(Value::Undefined)
            }),
        )
        .with(
            "test_no_coercion",
            Value::native("test_no_coercion", |_| {
                let coerced = assert::is_equal(&Value::from(1), &Value::from("1"), None);
                assert::is_true(&Value::Bool(coerced.is_err()), Some("1 must not equal '1'"))?;
                Ok(Value::Undefined)
            }),
        );

    Namespace::new()
        .with(
            "test_type_error",
            Value::native("test_type_error", |_| {
                let block = scriptunit_runtime::Function::new("block", |_| {
                    Err(Thrown::type_error("not callable"))
                });
                assert::throws_error(&block, Some("TypeError"), None)?;
                Ok(Value::Undefined)
            }),
        )
        .with("test_math", math)
        .with("test_strings", strings)
        .with(
            "helper",
            Value::native("helper", |_| Err(Thrown::new("helpers never run"))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scriptunit_runtime::{MemorySink, RunContext, TestRunner};

    #[test]
    fn test_registry_units() {
        let registry = registry(Arc::new(MemorySink::new()));
        assert_eq!(registry.names(), vec!["assert", "nested", "sample"]);
    }

    #[test]
    fn test_sample_counts() {
        let sink = MemorySink::new();
        let shared: Arc<dyn OutputSink> = Arc::new(sink.clone());
        let runner = TestRunner::new(registry(shared.clone()), shared);

        let context = runner.run("sample").unwrap();

        assert_eq!(context, RunContext { passed: 1, failed: 1, error: 1 });
        assert_eq!(sink.last().as_deref(), Some("Passed 1; Failed 1; Error 1;"));
    }

    #[test]
    fn test_nested_all_pass() {
        let sink: Arc<dyn OutputSink> = Arc::new(MemorySink::new());
        let runner = TestRunner::new(registry(sink.clone()), sink);

        let context = runner.run("nested").unwrap();

        assert_eq!(context, RunContext { passed: 5, failed: 0, error: 0 });
    }
}
