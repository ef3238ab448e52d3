//! Command-line resolution strategies.
//!
//! Reading another process's argument vector is reliable on Linux and macOS.
//! On Windows it breaks down when the reader and the target differ in
//! bitness, so there the OS query utility is asked first. The strategy is
//! chosen once by [`platform_resolver`]; the sampler applies the final
//! fallback to the executable path itself.

use std::process::Command;
use tracing::{debug, trace};

use crate::process::source::ProcessSource;

/// Placeholder substituted with the target pid in query utility arguments.
pub const PID_PLACEHOLDER: &str = "{pid}";

/// Resolves a process's command line as a sequence of arguments.
pub trait CmdlineResolver: Send + Sync {
    /// Returns `None` when this strategy cannot produce a non-empty command line.
    fn resolve(&self, source: &dyn ProcessSource, pid: u32) -> Option<Vec<String>>;

    fn name(&self) -> &str;
}

/// The argument vector exposed by the [`ProcessSource`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ArgvResolver;

impl CmdlineResolver for ArgvResolver {
    fn resolve(&self, source: &dyn ProcessSource, pid: u32) -> Option<Vec<String>> {
        match source.argv(pid) {
            Ok(argv) if argv.iter().any(|a| !a.trim().is_empty()) => Some(argv),
            Ok(_) => None,
            Err(e) => {
                trace!(pid, error = %e, "argv unavailable");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "argv"
    }
}

/// Runs an external process-query utility and reads its tabular output.
///
/// The utility prints the command line as one quoted string, which is kept
/// as a single argument.
#[derive(Debug, Clone)]
pub struct QueryUtilityResolver {
    program: String,
    args: Vec<String>,
}

impl QueryUtilityResolver {
    /// `args` may contain [`PID_PLACEHOLDER`], replaced per call.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `WMIC path win32_process where handle='<pid>' get Commandline`
    pub fn wmic() -> Self {
        Self::new(
            "WMIC",
            ["path", "win32_process", "where", "handle='{pid}'", "get", "Commandline"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    fn args_for(&self, pid: u32) -> Vec<String> {
        let pid = pid.to_string();
        self.args
            .iter()
            .map(|a| a.replace(PID_PLACEHOLDER, &pid))
            .collect()
    }
}

impl CmdlineResolver for QueryUtilityResolver {
    fn resolve(&self, _source: &dyn ProcessSource, pid: u32) -> Option<Vec<String>> {
        let output = match Command::new(&self.program).args(self.args_for(pid)).output() {
            Ok(o) => o,
            Err(e) => {
                debug!(pid, program = %self.program, error = %e, "query utility failed to start");
                return None;
            }
        };
        if !output.status.success() {
            debug!(pid, program = %self.program, status = %output.status, "query utility failed");
            return None;
        }
        parse_query_output(&String::from_utf8_lossy(&output.stdout)).map(|line| vec![line])
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Extracts the first data line from tabular query output.
///
/// The first line is a column header; blank lines (WMIC pads its output with
/// them) are skipped.
pub fn parse_query_output(output: &str) -> Option<String> {
    output
        .lines()
        .skip(1)
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Tries each resolver in turn; the first answer wins.
pub struct ChainResolver {
    resolvers: Vec<Box<dyn CmdlineResolver>>,
}

impl ChainResolver {
    pub fn new(resolvers: Vec<Box<dyn CmdlineResolver>>) -> Self {
        Self { resolvers }
    }
}

impl CmdlineResolver for ChainResolver {
    fn resolve(&self, source: &dyn ProcessSource, pid: u32) -> Option<Vec<String>> {
        self.resolvers.iter().find_map(|r| {
            let resolved = r.resolve(source, pid);
            if resolved.is_none() {
                trace!(pid, resolver = r.name(), "resolver produced nothing");
            }
            resolved
        })
    }

    fn name(&self) -> &str {
        "chain"
    }
}

/// Strategy for the platform this binary runs on.
pub fn platform_resolver() -> Box<dyn CmdlineResolver> {
    if cfg!(windows) {
        Box::new(ChainResolver::new(vec![
            Box::new(QueryUtilityResolver::wmic()),
            Box::new(ArgvResolver),
        ]))
    } else {
        Box::new(ArgvResolver)
    }
}
