//! Measure command implementation.
//!
//! Orchestrator-side entry point: waits for the settle period, then runs the
//! `sample` command as a separate process, elevated if needed, and relays its
//! output.

use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::info;

use procmem_sampler::elevate::{ElevatedSampler, ElevationMode};

/// Waits `settle_wait` seconds, then samples out of process.
pub fn command_measure(
    app: &str,
    config: Option<&Path>,
    os: Option<&str>,
    settle_wait: f64,
    elevate: ElevationMode,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !settle_wait.is_finite() || settle_wait < 0.0 {
        return Err(format!("Invalid settle wait '{}': expected seconds >= 0", settle_wait).into());
    }

    let helper = ElevatedSampler::new(std::env::current_exe()?, app, elevate)
        .setup_file(config)
        .os(os)
        .verbose(verbose);

    // Ask for the password now rather than in the middle of the measurement
    helper.prime_credentials()?;

    if settle_wait > 0.0 {
        info!("Waiting {:.1}s for memory to settle", settle_wait);
        thread::sleep(Duration::from_secs_f64(settle_wait));
    }

    let output = helper.run()?;
    print!("{}", output.stdout);
    if !output.stderr.is_empty() {
        eprintln!("Subprocess error:");
        eprintln!("{}", output.stderr.trim_end());
    }
    output.into_result()?;
    Ok(())
}
