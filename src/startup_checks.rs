//! Runtime requirement validation for procmem-sampler.
//!
//! This module checks that the sampler can see the processes it is going to
//! measure before a workload is started.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(proc_root: &Path) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges();
    check_proc_root(proc_root)?;
    check_foreign_process_access(proc_root)?;

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Warns when not running as root; never fatal.
#[cfg(unix)]
fn check_user_privileges() {
    if !nix::unistd::geteuid().is_root() {
        warn!("⚠️  Not running as root - processes of other users will be skipped");
        warn!("   Recommendation: sample through `measure --elevate always`");
    } else {
        info!("✅ Running as root (uid=0)");
    }
}

#[cfg(not(unix))]
fn check_user_privileges() {}

/// The proc root must list at least one process.
fn check_proc_root(proc_root: &Path) -> Result<(), ValidationError> {
    let entries = fs::read_dir(proc_root).map_err(|e| ValidationError::ProcUnavailable {
        root: proc_root.display().to_string(),
        source: e,
    })?;

    let has_pid = entries
        .flatten()
        .any(|e| e.file_name().to_str().is_some_and(|n| n.chars().all(|c| c.is_ascii_digit())));
    if !has_pid {
        return Err(ValidationError::NoProcesses(proc_root.display().to_string()));
    }
    info!("✅ {} lists processes", proc_root.display());
    Ok(())
}

/// Tests access to PID 1's memory maps, which belong to root.
fn check_foreign_process_access(proc_root: &Path) -> Result<(), ValidationError> {
    let test_file = proc_root.join("1").join("smaps_rollup");

    // stat succeeds even without access; opening is the real check
    match fs::File::open(&test_file) {
        Ok(_) => {
            info!("✅ Memory maps of other users' processes are readable");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            error!("❌ Cannot read {} - insufficient permissions", test_file.display());
            error!("   Only processes owned by this user will be measured!");
            error!("");
            error!("   Solutions:");
            error!("   1. Run the sampler as root or through sudo");
            error!("   2. Grant capabilities:");
            error!("      setcap cap_dac_read_search,cap_sys_ptrace+ep /path/to/procmem-sampler");
            Err(ValidationError::InsufficientPermissions(e.to_string()))
        }
        Err(e) => {
            warn!("⚠️  Could not test access to {}: {}", test_file.display(), e);
            Ok(()) // Continue but warn
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Insufficient permissions: {0}")]
    InsufficientPermissions(String),

    #[error("Cannot read proc filesystem at {root}: {source}")]
    ProcUnavailable {
        root: String,
        #[source]
        source: io::Error,
    },

    #[error("No processes listed under {0}")]
    NoProcesses(String),
}
