//! Scriptunit runtime
//!
//! A minimal unit-testing harness for script namespaces:
//! - [`assert`]: assertion primitives raising a distinguishable `AssertionError`
//! - [`runner`]: test discovery and execution with `setUp`/`tearDown` hooks
//! - [`module`]: name-to-namespace resolution
//! - [`output`]: line sinks for diagnostics and the summary line
//!
//! # Example
//!
//! ```
//! use scriptunit_runtime::{assert, MemorySink, ModuleRegistry, Namespace, TestRunner, Thrown, Value};
//! use std::sync::Arc;
//!
//! let suite = Namespace::new()
//!     .with("test_p", Value::native("test_p", |_| {
//!         assert::is_true(&Value::Bool(true), None)?;
//!         Ok(Value::Undefined)
//!     }))
//!     .with("test_e", Value::native("test_e", |_| Err(Thrown::new("oops"))));
//!
//! let sink = MemorySink::new();
//! let runner = TestRunner::new(ModuleRegistry::new(), Arc::new(sink.clone()));
//! let context = runner.run(suite).unwrap();
//!
//! assert_eq!((context.passed, context.failed, context.error), (1, 0, 1));
//! assert_eq!(sink.last().as_deref(), Some("Passed 1; Failed 0; Error 1;"));
//! ```

pub mod assert;
pub mod error;
pub mod module;
pub mod namespace;
pub mod output;
pub mod runner;
pub mod value;

pub use assert::{AssertionFailure, ASSERTION_ERROR};
pub use error::{ResolveError, RunError, RunResult, Thrown};
pub use module::{ModuleRegistry, ModuleResolver};
pub use namespace::Namespace;
pub use output::{MemorySink, OutputSink, StdoutSink};
pub use runner::{RunContext, Target, TestOutcome, TestRunner};
pub use value::{ErrorObject, Function, Value};
