//! Test runner - discover and execute test cases in a namespace
//!
//! A run walks the own members of a namespace. Members whose name starts
//! with [`TEST_PREFIX`] are tests: functions are run as single cases,
//! nested namespaces (or unit names) are recursed into as suites. Each case
//! is wrapped by the namespace's `setUp` and `tearDown` hooks.
//!
//! Every raise inside a case is contained and counted:
//! - an `AssertionError` raise counts as failed
//! - any other raise counts as an error
//!
//! Only structural problems (an unresolvable unit, nothing to run, a unit
//! that includes itself) abort the run with a [`RunError`].

use crate::assert::AssertionFailure;
use crate::error::{RunError, RunResult, Thrown};
use crate::module::ModuleResolver;
use crate::namespace::Namespace;
use crate::output::OutputSink;
use crate::value::{Function, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, debug_span, info, warn};

/// Members whose name starts with this prefix are tests
pub const TEST_PREFIX: &str = "test";
/// Hook run before every case of a namespace
pub const SET_UP: &str = "setUp";
/// Hook run after every case of a namespace
pub const TEAR_DOWN: &str = "tearDown";

/// Cumulative counters for one top-level run and all of its nested suites
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
    pub passed: usize,
    pub failed: usize,
    pub error: usize,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.error
    }

    /// No failed and no errored cases
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.error == 0
    }
}

/// Renders the summary line
impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Passed {}; Failed {}; Error {};",
            self.passed, self.failed, self.error
        )
    }
}

/// What to run: a namespace, or a unit name to resolve into one
#[derive(Debug, Clone)]
pub enum Target {
    Name(String),
    Namespace(Namespace),
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Name(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Name(name)
    }
}

impl From<Namespace> for Target {
    fn from(namespace: Namespace) -> Self {
        Target::Namespace(namespace)
    }
}

/// A discovered test function
#[derive(Debug, Clone)]
pub struct TestCase {
    name: String,
    function: Function,
}

impl TestCase {
    pub fn new(name: impl Into<String>, function: Function) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn call(&self) -> Result<Value, Thrown> {
        self.function.call(&[])
    }
}

/// A test member, classified once at discovery time
#[derive(Debug, Clone)]
pub enum Member {
    /// A single test function
    Case(TestCase),
    /// A nested suite, run with its own hooks
    Suite { name: String, target: Target },
}

/// Find the test members of a namespace, in enumeration order
///
/// Non-test members are ignored. Test members that are neither callable
/// nor suite-shaped are skipped.
pub fn discover(namespace: &Namespace) -> Vec<Member> {
    namespace
        .iter()
        .filter(|(name, _)| name.starts_with(TEST_PREFIX))
        .filter_map(|(name, value)| match value {
            Value::Function(func) => {
                Some(Member::Case(TestCase::new(name.as_str(), func.clone())))
            }
            Value::Namespace(ns) => Some(Member::Suite {
                name: name.clone(),
                target: Target::Namespace(ns.clone()),
            }),
            Value::String(unit) => Some(Member::Suite {
                name: name.clone(),
                target: Target::Name(unit.to_string()),
            }),
            other => {
                warn!(
                    member = name.as_str(),
                    kind = other.type_name(),
                    "skipping test member that is neither a function nor a suite"
                );
                None
            }
        })
        .collect()
}

/// Outcome of a single test body
#[derive(Debug, Clone)]
pub enum TestOutcome {
    Pass,
    /// The body raised an assertion failure
    Fail(AssertionFailure),
    /// The body raised anything else
    Error(Thrown),
}

impl TestOutcome {
    /// Classify the result of calling a test body
    pub fn classify(result: Result<Value, Thrown>) -> Self {
        match result {
            Ok(_) => TestOutcome::Pass,
            Err(thrown) => match AssertionFailure::from_thrown(&thrown) {
                Some(failure) => TestOutcome::Fail(failure),
                None => TestOutcome::Error(thrown),
            },
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestOutcome::Fail(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TestOutcome::Error(_))
    }
}

/// Report for one executed case
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    pub outcome: TestOutcome,
    /// Raise from `tearDown`, counted as an extra error
    pub teardown: Option<Thrown>,
}

/// `setUp` / `tearDown` of one namespace; absent hooks are no-ops
#[derive(Debug, Clone, Default)]
struct Hooks {
    set_up: Option<Function>,
    tear_down: Option<Function>,
}

impl Hooks {
    fn resolve(namespace: &Namespace) -> Self {
        let hook = |key: &str| namespace.get(key).and_then(Value::as_function).cloned();
        Self {
            set_up: hook(SET_UP),
            tear_down: hook(TEAR_DOWN),
        }
    }

    fn set_up(&self) -> Result<(), Thrown> {
        Self::call(self.set_up.as_ref())
    }

    fn tear_down(&self) -> Result<(), Thrown> {
        Self::call(self.tear_down.as_ref())
    }

    fn call(hook: Option<&Function>) -> Result<(), Thrown> {
        match hook {
            Some(func) => func.call(&[]).map(|_| ()),
            None => Ok(()),
        }
    }
}

/// Runs test namespaces and reports through an output sink
pub struct TestRunner<R> {
    resolver: R,
    sink: Arc<dyn OutputSink>,
}

impl<R: ModuleResolver> TestRunner<R> {
    /// Create a runner resolving unit names through `resolver`
    pub fn new(resolver: R, sink: Arc<dyn OutputSink>) -> Self {
        Self { resolver, sink }
    }

    /// Top-level run: fresh counters, one summary line at the end
    pub fn run(&self, target: impl Into<Target>) -> RunResult<RunContext> {
        let mut context = RunContext::new();
        self.run_with_context(target, &mut context)?;

        info!(
            passed = context.passed,
            failed = context.failed,
            error = context.error,
            "run finished"
        );
        self.sink.emit(&context.to_string());
        Ok(context)
    }

    /// Run into a caller-owned context. Never emits the summary line.
    pub fn run_with_context(
        &self,
        target: impl Into<Target>,
        context: &mut RunContext,
    ) -> RunResult<()> {
        self.run_target(target.into(), context, &mut Vec::new())
    }

    /// `loading` holds the unit names currently being run, outermost first
    fn run_target(
        &self,
        target: Target,
        context: &mut RunContext,
        loading: &mut Vec<String>,
    ) -> RunResult<()> {
        let unit = match &target {
            Target::Name(name) => {
                if loading.contains(name) {
                    return Err(RunError::Cycle { name: name.clone() });
                }
                Some(name.clone())
            }
            Target::Namespace(_) => None,
        };

        let namespace = self.resolve_target(target)?;
        if let Some(name) = unit {
            loading.push(name);
            let result = self.run_suite(&namespace, context, loading);
            loading.pop();
            result
        } else {
            self.run_suite(&namespace, context, loading)
        }
    }

    fn resolve_target(&self, target: Target) -> RunResult<Namespace> {
        let namespace = match target {
            Target::Namespace(namespace) => namespace,
            Target::Name(name) => match self.resolver.resolve(&name)? {
                Value::Namespace(namespace) => namespace,
                Value::Undefined | Value::Null => return Err(RunError::NothingToRun),
                _ => return Err(RunError::NotANamespace { name }),
            },
        };

        if namespace.is_empty() {
            return Err(RunError::NothingToRun);
        }
        Ok(namespace)
    }

    fn run_suite(
        &self,
        namespace: &Namespace,
        context: &mut RunContext,
        loading: &mut Vec<String>,
    ) -> RunResult<()> {
        let hooks = Hooks::resolve(namespace);

        for member in discover(namespace) {
            match member {
                Member::Case(case) => {
                    let report = self.run_case(&case, &hooks, context);
                    debug!(
                        case = report.name.as_str(),
                        pass = report.outcome.is_pass(),
                        teardown_raised = report.teardown.is_some(),
                        "case finished"
                    );
                }
                Member::Suite { name, target } => {
                    let _span = debug_span!("suite", name = name.as_str()).entered();
                    self.run_target(target, context, loading)?;
                }
            }
        }

        Ok(())
    }

    /// setUp, body, tearDown. tearDown runs whatever the earlier steps did.
    fn run_case(&self, case: &TestCase, hooks: &Hooks, context: &mut RunContext) -> CaseReport {
        let _span = debug_span!("case", name = case.name()).entered();

        // A raising setUp stands in for the body's outcome
        let outcome = match hooks.set_up() {
            Ok(()) => TestOutcome::classify(case.call()),
            Err(thrown) => TestOutcome::classify(Err(thrown)),
        };
        self.record(case.name(), &outcome, context);

        let teardown = hooks.tear_down().err();
        if let Some(thrown) = &teardown {
            warn!(error = %thrown, "tearDown raised");
            self.sink.emit(&format!(
                "Exception in {} after {}: {}",
                TEAR_DOWN,
                case.name(),
                thrown
            ));
            context.error += 1;
        }

        CaseReport {
            name: case.name().to_string(),
            outcome,
            teardown,
        }
    }

    fn record(&self, name: &str, outcome: &TestOutcome, context: &mut RunContext) {
        match outcome {
            TestOutcome::Pass => {
                debug!("passed");
                context.passed += 1;
            }
            TestOutcome::Fail(failure) => {
                debug!(message = failure.message(), "failed");
                self.sink.emit(&format!(
                    "Assertion Failed in {}: {}",
                    name,
                    Thrown::from(failure.clone())
                ));
                context.failed += 1;
            }
            TestOutcome::Error(thrown) => {
                debug!(error = %thrown, "errored");
                self.sink.emit(&format!("Exception in {}: {}", name, thrown));
                context.error += 1;
            }
        }
    }
}

impl<R> fmt::Debug for TestRunner<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRunner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use crate::module::ModuleRegistry;
    use crate::output::MemorySink;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn runner() -> (TestRunner<ModuleRegistry>, MemorySink) {
        let sink = MemorySink::new();
        (
            TestRunner::new(ModuleRegistry::new(), Arc::new(sink.clone())),
            sink,
        )
    }

    fn passing() -> Value {
        Value::native("pass", |_| Ok(Value::Undefined))
    }

    fn failing() -> Value {
        Value::native("fail", |_| {
            assert::is_true(&Value::Bool(false), None)?;
            Ok(Value::Undefined)
        })
    }

    #[test]
    fn test_outcome_classification() {
        assert!(TestOutcome::classify(Ok(Value::Null)).is_pass());
        assert!(TestOutcome::classify(Err(AssertionFailure::new("x").into())).is_fail());
        assert!(TestOutcome::classify(Err(Thrown::new("oops"))).is_error());
        assert!(TestOutcome::classify(Err(Thrown::type_error("x"))).is_error());
    }

    #[test]
    fn test_discover_classifies_members() {
        let ns = Namespace::new()
            .with("test_case", passing())
            .with("test_suite", Namespace::new().with("test_x", passing()))
            .with("test_unit", "other")
            .with("test_number", 3)
            .with("helper", passing());

        let members = discover(&ns);
        assert_eq!(members.len(), 3);
        assert!(matches!(&members[0], Member::Case(case) if case.name() == "test_case"));
        assert!(matches!(
            &members[1],
            Member::Suite { name, target: Target::Namespace(_) } if name == "test_suite"
        ));
        assert!(matches!(
            &members[2],
            Member::Suite { target: Target::Name(unit), .. } if unit == "other"
        ));
    }

    #[test]
    fn test_run_case_hook_order() {
        let (runner, sink) = runner();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let log = |label: &'static str| {
            let calls = calls.clone();
            Function::new(label, move |_| {
                calls.lock().unwrap().push(label);
                if label == "body" {
                    return Err(Thrown::new("boom"));
                }
                Ok(Value::Undefined)
            })
        };
        let hooks = Hooks {
            set_up: Some(log("setUp")),
            tear_down: Some(log("tearDown")),
        };
        let case = TestCase::new("test_body", log("body"));
        let mut context = RunContext::new();

        let report = runner.run_case(&case, &hooks, &mut context);

        assert!(report.outcome.is_error());
        assert!(report.teardown.is_none());
        assert_eq!(*calls.lock().unwrap(), vec!["setUp", "body", "tearDown"]);
        assert_eq!(sink.lines(), vec!["Exception in test_body: boom"]);
    }

    #[test]
    fn test_run_case_setup_raise_skips_body() {
        let (runner, _sink) = runner();
        let body_ran = Arc::new(Mutex::new(false));
        let flag = body_ran.clone();
        let torn_down = Arc::new(Mutex::new(false));
        let teardown_flag = torn_down.clone();

        let hooks = Hooks {
            set_up: Some(Function::new("setUp", |_| {
                Err(AssertionFailure::new("not ready").into())
            })),
            tear_down: Some(Function::new("tearDown", move |_| {
                *teardown_flag.lock().unwrap() = true;
                Ok(Value::Undefined)
            })),
        };
        let case = TestCase::new(
            "test_x",
            Function::new("test_x", move |_| {
                *flag.lock().unwrap() = true;
                Ok(Value::Undefined)
            }),
        );
        let mut context = RunContext::new();

        let report = runner.run_case(&case, &hooks, &mut context);

        assert!(report.outcome.is_fail());
        assert!(!*body_ran.lock().unwrap());
        assert!(*torn_down.lock().unwrap());
        assert_eq!(context, RunContext { passed: 0, failed: 1, error: 0 });
    }

    #[test]
    fn test_run_case_teardown_raise_is_additive() {
        let (runner, sink) = runner();
        let hooks = Hooks {
            set_up: None,
            tear_down: Some(Function::new("tearDown", |_| Err(Thrown::new("leak")))),
        };
        let case = TestCase::new("test_f", failing().as_function().unwrap().clone());
        let mut context = RunContext::new();

        let report = runner.run_case(&case, &hooks, &mut context);

        assert!(report.outcome.is_fail());
        assert_eq!(report.teardown.unwrap().to_string(), "leak");
        assert_eq!(context, RunContext { passed: 0, failed: 1, error: 1 });
        assert_eq!(
            sink.lines(),
            vec![
                "Assertion Failed in test_f: AssertionError: Expected true, actually 'false'",
                "Exception in tearDown after test_f: leak",
            ]
        );
    }

    #[test]
    fn test_run_with_context_does_not_summarize() {
        let (runner, sink) = runner();
        let mut context = RunContext { passed: 2, failed: 0, error: 0 };

        runner
            .run_with_context(Namespace::new().with("test_a", passing()), &mut context)
            .unwrap();

        assert_eq!(context.passed, 3);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_resolve_target_errors() {
        let mut registry = ModuleRegistry::new();
        registry.register("number", 5);
        registry.register("nothing", Value::Null);
        let runner = TestRunner::new(registry, Arc::new(MemorySink::new()));

        assert_eq!(
            runner.run("number").unwrap_err(),
            RunError::NotANamespace {
                name: "number".to_string()
            }
        );
        assert_eq!(runner.run("nothing").unwrap_err(), RunError::NothingToRun);
        assert_eq!(runner.run(Namespace::new()).unwrap_err(), RunError::NothingToRun);
    }

    #[test]
    fn test_summary_line() {
        let context = RunContext { passed: 1, failed: 2, error: 3 };
        assert_eq!(context.to_string(), "Passed 1; Failed 2; Error 3;");
        assert_eq!(context.total(), 6);
        assert!(!context.is_success());
        assert!(RunContext::new().is_success());
    }
}
