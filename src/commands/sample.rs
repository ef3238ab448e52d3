//! Sample command implementation.
//!
//! The out-of-process invocation surface: resolves the setup for one
//! application, samples once, prints the report on stdout.

use std::path::{Path, PathBuf};
use tracing::warn;

use procmem_sampler::process::{platform_resolver, platform_source, DEFAULT_PROC_ROOT};
use procmem_sampler::{platform_key, AggregateReport, Sampler, SetupFile};

use crate::cli::ReportFormat;

/// Samples the application's process tree once.
///
/// Any failure (setup or sampling) is returned to `main`, which prints it on
/// stderr and exits with status 1.
pub fn command_sample(
    app: &str,
    config: Option<&Path>,
    os: Option<&str>,
    proc_root: PathBuf,
    verbose: bool,
    format: ReportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let setup = SetupFile::load_or_builtin(config)?;
    let os = os.unwrap_or(platform_key());
    let (id, app_setup) = setup.app(os, app)?;
    let predicate = app_setup.predicate(id)?;

    if !cfg!(target_os = "linux") && proc_root != Path::new(DEFAULT_PROC_ROOT) {
        warn!("--proc-root {} ignored: no procfs on this OS", proc_root.display());
    }
    let sampler = Sampler::new(platform_source(&proc_root), platform_resolver(), predicate);
    let report = sampler.sample(verbose)?;

    println!("{}", render_report(&report, format)?);
    Ok(())
}

/// Renders a report in the requested output format.
pub fn render_report(
    report: &AggregateReport,
    format: ReportFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ReportFormat::Text => report.to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(report)?,
        ReportFormat::Yaml => serde_yaml::to_string(report)?,
    })
}
