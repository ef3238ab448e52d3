//! Memory parsing utilities for reading process memory metrics from /proc.
//!
//! This module provides functions to parse RSS and USS from
//! `/proc/<pid>/smaps` and `/proc/<pid>/smaps_rollup` files.

use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default read buffer for `/proc/<pid>/smaps` in KB.
pub const DEFAULT_SMAPS_BUFFER_KB: usize = 512;
/// Default read buffer for `/proc/<pid>/smaps_rollup` in KB.
pub const DEFAULT_SMAPS_ROLLUP_BUFFER_KB: usize = 256;

/// Buffer configuration for parsing operations.
#[derive(Debug, Clone, Copy)]
pub struct BufferConfig {
    pub smaps_kb: usize,
    pub smaps_rollup_kb: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            smaps_kb: DEFAULT_SMAPS_BUFFER_KB,
            smaps_rollup_kb: DEFAULT_SMAPS_ROLLUP_BUFFER_KB,
        }
    }
}

/// Memory figures for one process, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    /// Resident set size: every resident page, shared ones included.
    pub rss: u64,
    /// Unique set size: private clean + private dirty pages.
    pub uss: u64,
}

/// Parses Rss and Private_* totals out of an smaps-formatted file.
///
/// smaps_rollup has a single block, smaps has one block per mapping; summing
/// every matching line handles both.
fn parse_smaps_file(path: &Path, buf_kb: usize) -> Result<MemoryInfo, std::io::Error> {
    let file = fs::File::open(path)?;
    let reader = BufReader::with_capacity(buf_kb.max(1) * 1024, file);

    let mut rss_kb = 0;
    let mut private_clean_kb = 0;
    let mut private_dirty_kb = 0;

    for line in reader.lines() {
        let l = line?;
        if let Some(v) = l.strip_prefix("Rss:") {
            rss_kb += parse_kb_value(v).unwrap_or(0);
        } else if let Some(v) = l.strip_prefix("Private_Clean:") {
            private_clean_kb += parse_kb_value(v).unwrap_or(0);
        } else if let Some(v) = l.strip_prefix("Private_Dirty:") {
            private_dirty_kb += parse_kb_value(v).unwrap_or(0);
        }
    }

    Ok(MemoryInfo {
        rss: rss_kb * 1024,
        uss: (private_clean_kb + private_dirty_kb) * 1024,
    })
}

/// Fast parser for /proc/<pid>/smaps_rollup (Linux >= 4.14).
pub fn parse_smaps_rollup(path: &Path, buf_kb: usize) -> Result<MemoryInfo, std::io::Error> {
    parse_smaps_file(path, buf_kb)
}

/// Parses memory metrics from the full /proc/<pid>/smaps file.
pub fn parse_smaps(path: &Path, buf_kb: usize) -> Result<MemoryInfo, std::io::Error> {
    parse_smaps_file(path, buf_kb)
}

/// Parses kilobyte values from smaps file lines.
pub fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}

/// Selects the fastest available memory parser.
/// Uses smaps_rollup when available, otherwise falls back to full smaps.
pub fn parse_memory_for_process(
    proc_path: &Path,
    buffers: &BufferConfig,
) -> Result<MemoryInfo, std::io::Error> {
    let rollup = proc_path.join("smaps_rollup");
    if rollup.exists() {
        return parse_smaps_rollup(&rollup, buffers.smaps_rollup_kb);
    }

    let smaps = proc_path.join("smaps");
    parse_smaps(&smaps, buffers.smaps_kb)
}
