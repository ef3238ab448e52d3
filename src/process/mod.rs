//! Process-related modules for discovery, memory and classification.
//!
//! This module provides:
//! - `scanner`: Process discovery and /proc readers
//! - `memory`: RSS/USS parsing from /proc/<pid>/smaps
//! - `source`: The `ProcessSource` seam and its procfs implementation
//! - `sysinfo_source`: `ProcessSource` for macOS and Windows
//! - `uss`: Per-OS unique set size readers
//! - `cmdline`: Platform command-line resolution strategies
//! - `classifier`: Parent/child role classification

pub mod classifier;
pub mod cmdline;
pub mod memory;
pub mod scanner;
pub mod source;
pub mod sysinfo_source;
pub mod uss;

// Re-export commonly used types
pub use classifier::{ClassificationPredicate, Predicate, Role};
pub use cmdline::{
    parse_query_output, platform_resolver, ArgvResolver, ChainResolver, CmdlineResolver,
    QueryUtilityResolver,
};
pub use memory::{parse_memory_for_process, BufferConfig, MemoryInfo};
pub use scanner::{collect_pids, read_argv, read_exe_path};
pub use source::{platform_source, ProcessSource, ProcfsSource, DEFAULT_PROC_ROOT};
pub use sysinfo_source::SysinfoSource;
