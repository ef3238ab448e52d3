//! CLI arguments and subcommands for procmem-sampler.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use procmem_sampler::elevate::ElevationMode;
use procmem_sampler::process::DEFAULT_PROC_ROOT;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Output format of a sampling report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Yaml,
}

/// Setup file format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procmem-sampler",
    about = "Measure a multi-process application's memory as parent RSS plus children USS",
    long_about = "Measure a multi-process application's memory as parent RSS plus children USS.\n\n\
                  Finds the processes of one application (for example a browser and its content \
                  processes), classifies each as parent or child, and prints per-process figures \
                  and a single total that does not double-count shared memory.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample the application's processes once and print the report
    Sample {
        /// Application id in the setup file
        #[arg(short = 'b', long = "browser", default_value = "Firefox")]
        app: String,

        /// Setup file (YAML/JSON/TOML); the built-in setup is used when omitted
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// OS key in the setup file (linux, mac, win); defaults to the running OS
        #[arg(long)]
        os: Option<String>,

        /// Root of the proc filesystem (Linux only)
        #[arg(long, default_value = DEFAULT_PROC_ROOT)]
        proc_root: PathBuf,

        /// Show full command lines instead of executable paths
        #[arg(short = 'v', long)]
        verbose: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Wait for memory to settle, then sample in a separate (optionally elevated) process
    Measure {
        /// Application id in the setup file
        #[arg(short = 'b', long = "browser", default_value = "Firefox")]
        app: String,

        /// Setup file (YAML/JSON/TOML); the built-in setup is used when omitted
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// OS key in the setup file (linux, mac, win); defaults to the running OS
        #[arg(long)]
        os: Option<String>,

        /// Seconds to wait before sampling
        #[arg(long, default_value_t = 0.0)]
        settle_wait: f64,

        /// Run the sampler through `sudo -n`
        #[arg(long, value_enum, default_value = "auto")]
        elevate: ElevationMode,

        /// Show full command lines instead of executable paths
        #[arg(short = 'v', long)]
        verbose: bool,
    },

    /// List the applications configured for an OS
    Setups {
        /// Setup file (YAML/JSON/TOML); the built-in setup is used when omitted
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// OS key to list; defaults to the running OS
        #[arg(long)]
        os: Option<String>,

        /// Also show binaries
        #[arg(short = 'v', long)]
        verbose: bool,
    },

    /// Write the built-in setup as a starting point for a custom one
    SetupTemplate {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },

    /// Check runtime requirements and permissions
    Check {
        /// Root of the proc filesystem (Linux only)
        #[arg(long, default_value = DEFAULT_PROC_ROOT)]
        proc_root: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_sample_defaults() {
        let args = Args::parse_from(["procmem-sampler", "sample"]);
        match args.command {
            Commands::Sample {
                app,
                config,
                os,
                proc_root,
                verbose,
                ..
            } => {
                assert_eq!(app, "Firefox");
                assert!(config.is_none());
                assert!(os.is_none());
                assert_eq!(proc_root, PathBuf::from("/proc"));
                assert!(!verbose);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_helper_invocation_parses() {
        // Mirrors the argument vector built by ElevatedSampler::command_line
        let args = Args::parse_from([
            "procmem-sampler",
            "--log-level",
            "error",
            "sample",
            "-b",
            "Chrome",
            "-c",
            "/etc/setup.yaml",
            "--os",
            "mac",
            "--verbose",
        ]);
        assert!(matches!(args.log_level, LogLevel::Error));
        match args.command {
            Commands::Sample {
                app, config, os, verbose, ..
            } => {
                assert_eq!(app, "Chrome");
                assert_eq!(config, Some(PathBuf::from("/etc/setup.yaml")));
                assert_eq!(os.as_deref(), Some("mac"));
                assert!(verbose);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
