//! toyvm CLI - run stack machine programs on a mark-sweep heap.
//!
//! This is the main entry point for the toyvm binary. It uses clap for
//! argument parsing and dispatches to the scenario runner or the program
//! runner.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use toygc::config::{DEFAULT_INITIAL_THRESHOLD, DEFAULT_ROOT_CAPACITY};
use toygc::GcConfig;
use toyvm::{run_scenario, scenario, Program, Vm};

/// toyvm - a toy stack machine with a mark-sweep garbage collector
#[derive(Parser, Debug)]
#[command(name = "toyvm")]
#[command(author = "Toyvm Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A toy stack machine with a mark-sweep garbage collector", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (GC cycle logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Live object count that triggers the first collection
    #[arg(short, long, global = true, default_value_t = DEFAULT_INITIAL_THRESHOLD)]
    threshold: usize,

    /// Maximum depth of the value stack
    #[arg(long, global = true, default_value_t = DEFAULT_ROOT_CAPACITY)]
    root_capacity: usize,

    /// Disable color output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the toyvm CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the demonstration scenarios
    ///
    /// Each scenario runs on a fresh machine and checks the number of live
    /// objects it leaves behind. Exits non-zero if any scenario fails.
    Scenarios(ScenariosCommand),

    /// Run a program
    ///
    /// Executes a program from a file or from the command line, then prints
    /// the final stack and a heap summary.
    Run(RunCommand),
}

/// Arguments for the scenarios subcommand.
#[derive(Parser, Debug)]
struct ScenariosCommand {
    /// Print the reports as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "eval"])))]
struct RunCommand {
    /// Program file
    file: Option<PathBuf>,

    /// Program text, e.g. "push 1; push 2; pair"
    #[arg(short, long, value_name = "SCRIPT")]
    eval: Option<String>,

    /// Print the heap summary as JSON
    #[arg(long)]
    json: bool,
}

/// Main entry point for the toyvm CLI.
///
/// Parses command-line arguments, initializes logging, and dispatches to
/// the selected command.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.no_color)?;

    let config = gc_config(&cli);
    config.validate().context("invalid GC settings")?;

    match cli.command {
        Commands::Scenarios(args) => execute_scenarios(args, config),
        Commands::Run(args) => execute_run(args, config),
    }
}

/// Initialize the logging system.
///
/// Library crates log through the `log` facade; the subscriber picks those
/// records up as well.
fn init_logging(verbose: bool, no_color: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Collector configuration from the global flags.
fn gc_config(cli: &Cli) -> GcConfig {
    GcConfig {
        initial_threshold: cli.threshold,
        root_capacity: cli.root_capacity,
        verbose: cli.verbose,
        ..Default::default()
    }
}

/// Execute the scenarios command.
fn execute_scenarios(args: ScenariosCommand, config: GcConfig) -> anyhow::Result<()> {
    let scenarios = scenario::all();
    let mut reports = Vec::new();
    let mut failed = 0;

    for scenario in &scenarios {
        match run_scenario(scenario, config.clone()) {
            Ok(report) => {
                if !args.json {
                    println!(
                        "[PASS] {} ({} live, {} collections)",
                        report.name, report.live_objects, report.collections
                    );
                }
                reports.push(report);
            },
            Err(e) => {
                failed += 1;
                tracing::error!("{}", e);
                if !args.json {
                    println!("[FAIL] {}: {}", scenario.name, e);
                }
            },
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if failed > 0 {
        bail!("{} of {} scenarios failed", failed, scenarios.len());
    }
    tracing::info!("all {} scenarios passed", scenarios.len());
    Ok(())
}

/// Execute the run command.
fn execute_run(args: RunCommand, config: GcConfig) -> anyhow::Result<()> {
    let source = match (&args.file, args.eval) {
        (_, Some(script)) => script,
        (Some(path), None) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("no program given"),
    };

    let program = Program::parse(&source)?;
    let mut vm = Vm::new(config)?;
    vm.run(&program)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&vm.summary())?);
        return Ok(());
    }

    for (depth, value) in vm.render_stack()?.iter().enumerate() {
        println!("[{}] {}", depth, value);
    }
    let summary = vm.summary();
    println!(
        "live objects: {}, collections: {}, threshold: {}",
        summary.live_objects, summary.total_cycles, summary.threshold
    );

    Ok(())
}
