//! Process scanning utilities for discovering and reading processes from /proc.
//!
//! This module provides functions to list the numeric PID directories under a
//! proc root and to read each process's executable path and argument vector.

use std::fs;
use std::io;
use std::path::Path;

/// Suffix the kernel appends to `exe` when the binary was replaced on disk.
const DELETED_SUFFIX: &str = " (deleted)";

/// Scans the proc root for numeric PID directories, sorted by PID.
pub fn collect_pids(root: &Path) -> io::Result<Vec<u32>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)?.flatten() {
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(v) => v,
            None => continue,
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        match name.parse() {
            Ok(pid) => out.push(pid),
            Err(_) => continue,
        }
    }
    out.sort_unstable();
    Ok(out)
}

/// Reads the executable path of a process from its `exe` link.
///
/// Fails with `NotFound` for kernel threads and exited processes and with
/// `PermissionDenied` for processes owned by other users.
pub fn read_exe_path(proc_path: &Path) -> io::Result<String> {
    let target = fs::read_link(proc_path.join("exe"))?;
    let s = target.to_string_lossy();
    Ok(s.strip_suffix(DELETED_SUFFIX).unwrap_or(&s).to_string())
}

/// Reads the NUL-separated argument vector from `cmdline`.
pub fn read_argv(proc_path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read(proc_path.join("cmdline"))?;
    Ok(split_cmdline(&content))
}

/// Splits raw `cmdline` content into arguments, dropping trailing empty entries.
pub fn split_cmdline(content: &[u8]) -> Vec<String> {
    let mut parts: Vec<String> = content
        .split(|&b| b == 0u8)
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();
    while parts.last().is_some_and(|s| s.is_empty()) {
        parts.pop();
    }
    parts
}
