use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod samples;

/// Minimal unit-testing harness for script namespaces.
///
/// Loads a unit by name, runs every member whose name starts with `test`
/// between the unit's setUp/tearDown hooks, and prints one summary line.
///
/// EXAMPLES:
///     scriptunit run               Run the configured units (or `sample`)
///     scriptunit run nested        Run a named unit
///     scriptunit list              List the units that can be run
///
/// ENVIRONMENT VARIABLES:
///     SCRIPTUNIT_LOG    Log level for stderr diagnostics (error..trace)
///     NO_COLOR          Set to disable colored output
#[derive(Parser)]
#[command(name = "scriptunit")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (overrides SCRIPTUNIT_LOG and scriptunit.toml)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more units
    ///
    /// Each unit is a top-level run with its own summary line. Exits with
    /// status 1 when any test failed or errored.
    ///
    /// EXAMPLES:
    ///     scriptunit run                Run configured units
    ///     scriptunit run sample nested  Run two units
    #[command(visible_alias = "r")]
    Run {
        /// Names of the units to run
        units: Vec<String>,
    },

    /// List the units that can be run
    #[command(visible_alias = "ls")]
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // scriptunit.toml is optional; env overrides are applied by the loader
    let config = scriptunit_config::ConfigLoader::new()
        .load_from_directory(&std::env::current_dir()?)?;

    let log_level = cli.log_level.as_deref().unwrap_or(config.log_level());
    logging::init(log_level);

    if cli.no_color || !config.color() {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Run { units } => {
            let args = commands::run::RunArgs { units };
            let context = commands::run::run(args, &config)?;
            if !context.is_success() {
                std::process::exit(1);
            }
        }
        Commands::List => {
            commands::list::run();
        }
    }

    Ok(())
}
