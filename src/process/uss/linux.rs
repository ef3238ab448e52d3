use std::io;
use std::path::Path;

use crate::process::memory::{parse_memory_for_process, BufferConfig};
use crate::process::source::DEFAULT_PROC_ROOT;

/// USS in bytes, read from the process's smaps.
pub fn unique_set_size(pid: u32) -> io::Result<u64> {
    let proc_path = Path::new(DEFAULT_PROC_ROOT).join(pid.to_string());
    Ok(parse_memory_for_process(&proc_path, &BufferConfig::default())?.uss)
}
