//! Fake proc filesystem for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory laid out like `/proc`.
pub struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp proc root"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn pid_dir(&self, pid: u32) -> PathBuf {
        let p = self.dir.path().join(pid.to_string());
        fs::create_dir_all(&p).expect("create pid dir");
        p
    }

    /// Adds a process with an `exe` link, a `cmdline` and an `smaps_rollup`.
    /// Sizes are in kB, as the kernel reports them.
    pub fn add(&self, pid: u32, exe: &str, argv: &[&str], rss_kb: u64, uss_kb: u64) -> &Self {
        self.add_exe(pid, exe);
        self.add_cmdline(pid, argv);
        self.add_rollup(pid, rss_kb, uss_kb);
        self
    }

    pub fn add_exe(&self, pid: u32, exe: &str) -> &Self {
        let dir = self.pid_dir(pid);
        std::os::unix::fs::symlink(exe, dir.join("exe")).expect("symlink exe");
        self
    }

    pub fn add_cmdline(&self, pid: u32, argv: &[&str]) -> &Self {
        let mut content = Vec::new();
        for arg in argv {
            content.extend_from_slice(arg.as_bytes());
            content.push(0);
        }
        fs::write(self.pid_dir(pid).join("cmdline"), content).expect("write cmdline");
        self
    }

    /// Splits `uss_kb` into private clean and private dirty halves.
    pub fn add_rollup(&self, pid: u32, rss_kb: u64, uss_kb: u64) -> &Self {
        let clean = uss_kb / 2;
        let dirty = uss_kb - clean;
        let shared = rss_kb.saturating_sub(uss_kb);
        let content = format!(
            "00400000-7fffffffffff ---p 00000000 00:00 0    [rollup]\n\
             Rss:            {rss_kb} kB\n\
             Pss:            {uss_kb} kB\n\
             Shared_Clean:   {shared} kB\n\
             Shared_Dirty:   0 kB\n\
             Private_Clean:  {clean} kB\n\
             Private_Dirty:  {dirty} kB\n\
             Swap:           0 kB\n"
        );
        fs::write(self.pid_dir(pid).join("smaps_rollup"), content).expect("write smaps_rollup");
        self
    }
}
