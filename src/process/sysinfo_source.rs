//! Process table through `sysinfo`, for systems without procfs.
//!
//! Pids, executable paths, argument vectors and RSS come from one `sysinfo`
//! snapshot refreshed by [`ProcessSource::pids`]. USS is not something
//! `sysinfo` exposes; it is read per process by [`unique_set_size`].

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sysinfo::{Pid, PidExt, Process, ProcessExt, System, SystemExt};

use crate::process::memory::MemoryInfo;
use crate::process::source::ProcessSource;
use crate::process::uss::unique_set_size;

/// [`ProcessSource`] backed by a `sysinfo` process snapshot.
pub struct SysinfoSource {
    system: Mutex<System>,
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    fn system(&self) -> MutexGuard<'_, System> {
        self.system.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_process<T>(&self, pid: u32, f: impl FnOnce(&Process) -> io::Result<T>) -> io::Result<T> {
        let system = self.system();
        match system.process(Pid::from_u32(pid)) {
            Some(process) => f(process),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("process {} is not in the snapshot", pid),
            )),
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSource for SysinfoSource {
    fn pids(&self) -> io::Result<Vec<u32>> {
        let mut system = self.system();
        system.refresh_processes();
        let mut pids: Vec<u32> = system.processes().keys().map(|pid| pid.as_u32()).collect();
        pids.sort_unstable();
        Ok(pids)
    }

    fn exe(&self, pid: u32) -> io::Result<String> {
        self.with_process(pid, |process| {
            let exe = process.exe();
            // sysinfo leaves the path empty when the OS refuses to reveal it
            if exe.as_os_str().is_empty() {
                Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("executable path of process {} is not visible", pid),
                ))
            } else {
                Ok(exe.to_string_lossy().into_owned())
            }
        })
    }

    fn argv(&self, pid: u32) -> io::Result<Vec<String>> {
        self.with_process(pid, |process| Ok(process.cmd().to_vec()))
    }

    fn memory(&self, pid: u32) -> io::Result<MemoryInfo> {
        let rss = self.with_process(pid, |process| Ok(process.memory()))?;
        let uss = unique_set_size(pid)?;
        Ok(MemoryInfo { rss, uss })
    }
}
