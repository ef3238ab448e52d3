//! Process table access behind a trait.
//!
//! The sampler only talks to [`ProcessSource`]. [`ProcfsSource`] is the Linux
//! implementation backed by a proc root (normally `/proc`);
//! [`SysinfoSource`] covers macOS and Windows.

use std::io;
use std::path::{Path, PathBuf};

use crate::process::memory::{parse_memory_for_process, BufferConfig, MemoryInfo};
use crate::process::scanner::{collect_pids, read_argv, read_exe_path};
use crate::process::sysinfo_source::SysinfoSource;

/// Default location of the proc filesystem.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Read access to the OS process table.
///
/// Per-process calls are expected to fail fast with `NotFound` when the
/// process has exited since [`ProcessSource::pids`] listed it.
pub trait ProcessSource: Send + Sync {
    /// Lists every process visible to the caller.
    fn pids(&self) -> io::Result<Vec<u32>>;

    /// Absolute path of the process executable.
    fn exe(&self, pid: u32) -> io::Result<String>;

    /// Argument vector as recorded by the OS; may be empty.
    fn argv(&self, pid: u32) -> io::Result<Vec<String>>;

    /// RSS and USS of the process.
    fn memory(&self, pid: u32) -> io::Result<MemoryInfo>;
}

/// [`ProcessSource`] reading `<root>/<pid>/{exe,cmdline,smaps_rollup,smaps}`.
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    root: PathBuf,
    buffers: BufferConfig,
}

impl ProcfsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            buffers: BufferConfig::default(),
        }
    }

    pub fn with_buffers(mut self, buffers: BufferConfig) -> Self {
        self.buffers = buffers;
        self
    }

    fn proc_path(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string())
    }
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcessSource for ProcfsSource {
    fn pids(&self) -> io::Result<Vec<u32>> {
        collect_pids(&self.root)
    }

    fn exe(&self, pid: u32) -> io::Result<String> {
        read_exe_path(&self.proc_path(pid))
    }

    fn argv(&self, pid: u32) -> io::Result<Vec<String>> {
        read_argv(&self.proc_path(pid))
    }

    fn memory(&self, pid: u32) -> io::Result<MemoryInfo> {
        parse_memory_for_process(&self.proc_path(pid), &self.buffers)
    }
}

/// Process table of the running OS: procfs on Linux, sysinfo elsewhere.
///
/// `proc_root` only applies to the procfs source.
pub fn platform_source(proc_root: &Path) -> Box<dyn ProcessSource> {
    if cfg!(target_os = "linux") {
        Box::new(ProcfsSource::new(proc_root))
    } else {
        Box::new(SysinfoSource::new())
    }
}
