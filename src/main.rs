//! procmem-sampler
//!
//! Process-tree memory sampler with tracing logging.
//! This is the main entry point that initializes logging and dispatches subcommands.

mod cli;
mod commands;
mod startup_checks;

use clap::Parser;
use tracing::debug;
use tracing::level_filters::LevelFilter;

use cli::{Args, Commands, LogLevel};
use commands::{
    command_check, command_measure, command_sample, command_setup_template, command_setups,
};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr: stdout carries the report and is parsed by the
/// orchestrator when sampling out of process.
fn setup_logging(level: LogLevel) {
    let filter = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    debug!("Logging initialized with level: {:?}", level);
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Commands::Sample {
            app,
            config,
            os,
            proc_root,
            verbose,
            format,
        } => command_sample(
            &app,
            config.as_deref(),
            os.as_deref(),
            proc_root,
            verbose,
            format,
        ),

        Commands::Measure {
            app,
            config,
            os,
            settle_wait,
            elevate,
            verbose,
        } => command_measure(
            &app,
            config.as_deref(),
            os.as_deref(),
            settle_wait,
            elevate,
            verbose,
        ),

        Commands::Setups {
            config,
            os,
            verbose,
        } => command_setups(config.as_deref(), os.as_deref(), verbose),

        Commands::SetupTemplate { output, format } => command_setup_template(output, format),

        Commands::Check { proc_root } => command_check(&proc_root),
    }
}

/// Main application entry point.
fn main() {
    let args = Args::parse();
    setup_logging(args.log_level);

    if let Err(e) = run(args) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
