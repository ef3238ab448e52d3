//! Unique set size of another process.
//!
//! ## Linux
//!
//! `Private_Clean` + `Private_Dirty` from `/proc/<pid>/smaps_rollup`, or from
//! `/proc/<pid>/smaps` on kernels without the rollup.
//!
//! ## macOS
//!
//! The task's VM regions are walked with `mach_vm_region(VM_REGION_TOP_INFO)`
//! and pages private to the task are counted. This needs a task port from
//! `task_for_pid`, which the kernel only grants to root for processes of
//! other users.
//!
//! ## Windows
//!
//! Private bytes (`PrivateUsage`) from `GetProcessMemoryInfo`.

use std::io;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::unique_set_size;

#[cfg(target_os = "macos")]
mod darwin;

#[cfg(target_os = "macos")]
pub use darwin::unique_set_size;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "windows")]
pub use self::windows::unique_set_size;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub fn unique_set_size(_pid: u32) -> io::Result<u64> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unique set size is not available on this platform",
    ))
}

/// Unique set size of the calling process.
pub fn own_unique_set_size() -> io::Result<u64> {
    unique_set_size(std::process::id())
}
