//! Out-of-process sampling with optional privilege elevation.
//!
//! Reading other processes' memory maps may need root (notably on macOS),
//! but the browser under test must never run elevated. The orchestrator
//! therefore runs the sampler as a separate `sample` invocation of this
//! binary, prefixed with `sudo -n` when elevation is needed, and reads the
//! report from its stdout and exit status.

use clap::ValueEnum;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// When to prefix the sampler invocation with `sudo -n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElevationMode {
    /// Elevate on macOS when not already root.
    Auto,
    Always,
    Never,
}

impl ElevationMode {
    pub fn needs_sudo(self) -> bool {
        match self {
            ElevationMode::Always => true,
            ElevationMode::Never => false,
            ElevationMode::Auto => cfg!(target_os = "macos") && !is_root(),
        }
    }
}

#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}

#[derive(Debug, thiserror::Error)]
pub enum ElevateError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("sudo -v failed ({0}); cannot sample with elevated rights")]
    Credentials(ExitStatus),

    #[error("Sampler subprocess failed ({status})")]
    Sampler { status: ExitStatus },
}

/// Captured result of one sampler subprocess.
#[derive(Debug, Clone)]
pub struct HelperOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `<program> sample ...` as a separate, possibly elevated, process.
#[derive(Debug, Clone)]
pub struct ElevatedSampler {
    program: PathBuf,
    app: String,
    setup: Option<PathBuf>,
    os: Option<String>,
    verbose: bool,
    sudo: bool,
}

impl ElevatedSampler {
    /// `program` is the sampler binary, normally `std::env::current_exe()`.
    pub fn new(program: impl Into<PathBuf>, app: impl Into<String>, mode: ElevationMode) -> Self {
        Self {
            program: program.into(),
            app: app.into(),
            setup: None,
            os: None,
            verbose: false,
            sudo: mode.needs_sudo(),
        }
    }

    pub fn setup_file(mut self, path: Option<&Path>) -> Self {
        self.setup = path.map(Path::to_path_buf);
        self
    }

    pub fn os(mut self, os: Option<&str>) -> Self {
        self.os = os.map(str::to_string);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn uses_sudo(&self) -> bool {
        self.sudo
    }

    /// Caches sudo credentials so the later `sudo -n` does not prompt.
    ///
    /// Call this before launching the browser.
    pub fn prime_credentials(&self) -> Result<(), ElevateError> {
        if !self.sudo {
            return Ok(());
        }
        info!("Requesting sudo now so memory can be measured later without prompting");
        let status = Command::new("sudo")
            .arg("-v")
            .status()
            .map_err(|source| ElevateError::Spawn {
                program: "sudo".into(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ElevateError::Credentials(status))
        }
    }

    /// Full argument vector of the subprocess, program first.
    pub fn command_line(&self) -> Vec<OsString> {
        let mut cmd: Vec<OsString> = Vec::new();
        if self.sudo {
            cmd.push("sudo".into());
            cmd.push("-n".into());
        }
        cmd.push(self.program.clone().into_os_string());
        cmd.extend(["--log-level", "error", "sample", "-b"].map(OsString::from));
        cmd.push(self.app.clone().into());
        if let Some(setup) = &self.setup {
            cmd.push("-c".into());
            cmd.push(setup.clone().into_os_string());
        }
        if let Some(os) = &self.os {
            cmd.push("--os".into());
            cmd.push(os.clone().into());
        }
        if self.verbose {
            cmd.push("--verbose".into());
        }
        cmd
    }

    /// Runs the sampler subprocess and captures its output.
    ///
    /// A non-zero exit is not an error here; see [`HelperOutput::into_result`].
    pub fn run(&self) -> Result<HelperOutput, ElevateError> {
        let cmd = self.command_line();
        let (program, args) = cmd.split_first().ok_or_else(|| ElevateError::Spawn {
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
        })?;
        debug!("Running sampler subprocess: {:?}", cmd);

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ElevateError::Spawn {
                program: program.to_string_lossy().into_owned(),
                source,
            })?;

        Ok(HelperOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl HelperOutput {
    pub fn into_result(self) -> Result<HelperOutput, ElevateError> {
        if self.status.success() {
            Ok(self)
        } else {
            Err(ElevateError::Sampler {
                status: self.status,
            })
        }
    }
}
