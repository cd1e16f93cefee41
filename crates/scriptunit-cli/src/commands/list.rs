//! List command - show the units that can be run

use crate::samples;
use colored::*;
use scriptunit_runtime::StdoutSink;
use std::sync::Arc;

/// Print every registered unit name, one per line
pub fn run() {
    let registry = samples::registry(Arc::new(StdoutSink));

    println!("{}", "Available units:".bold());
    for name in registry.names() {
        println!("  {}", name);
    }
}
