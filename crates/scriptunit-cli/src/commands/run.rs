//! Run command - run named units top-level

use crate::samples;
use anyhow::{Context, Result};
use colored::*;
use scriptunit_config::Config;
use scriptunit_runtime::{OutputSink, RunContext, StdoutSink, TestRunner};
use std::sync::Arc;
use tracing::info;

/// Arguments for the run command
#[derive(Debug, Default)]
pub struct RunArgs {
    /// Units named on the command line
    pub units: Vec<String>,
}

/// Units to run: command line, then scriptunit.toml, then the sample unit
fn select_units(args: RunArgs, config: &Config) -> Vec<String> {
    if !args.units.is_empty() {
        args.units
    } else if !config.units().is_empty() {
        config.units().to_vec()
    } else {
        vec![samples::DEFAULT_UNIT.to_string()]
    }
}

/// Run every selected unit, each as its own top-level run
///
/// Returns the counters of all units added together.
pub fn run(args: RunArgs, config: &Config) -> Result<RunContext> {
    let sink: Arc<dyn OutputSink> = Arc::new(StdoutSink);
    let runner = TestRunner::new(samples::registry(sink.clone()), sink);

    let mut total = RunContext::new();
    for unit in select_units(args, config) {
        println!("{}", format!("Running `{}`", unit).blue().bold());
        info!(unit = unit.as_str(), "running unit");

        let context = runner
            .run(unit.as_str())
            .with_context(|| format!("failed to run unit `{}`", unit))?;

        total.passed += context.passed;
        total.failed += context.failed;
        total.error += context.error;
    }

    Ok(total)
}
