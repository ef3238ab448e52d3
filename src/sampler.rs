//! The process-tree memory sampler.
//!
//! One call to [`Sampler::sample`] walks the process table once:
//!
//! 1. every visible pid is listed;
//! 2. processes whose executable path cannot be read (exited, kernel thread,
//!    access denied) are skipped silently;
//! 3. the path filter selects the application's processes;
//! 4. their command line is resolved, falling back to the executable path;
//! 5. RSS and USS are read, and a failure here aborts the pass;
//! 6. the parent filter assigns the role: parents count RSS, children USS.
//!
//! Children share code and graphics buffers with the parent and with each
//! other, so summing their RSS would count shared pages several times. USS is
//! additive; RSS for the single parent keeps its shared pages counted once.

use std::path::Path;
use tracing::{debug, info, trace};

use crate::error::SampleError;
use crate::process::{
    platform_resolver, platform_source, ClassificationPredicate, CmdlineResolver, ProcessSource,
    DEFAULT_PROC_ROOT,
};
use crate::report::{AggregateReport, ProcessLine, ProcessSnapshot};

/// Samples the memory of one application's process tree.
pub struct Sampler {
    source: Box<dyn ProcessSource>,
    resolver: Box<dyn CmdlineResolver>,
    predicate: ClassificationPredicate,
}

impl Sampler {
    pub fn new(
        source: Box<dyn ProcessSource>,
        resolver: Box<dyn CmdlineResolver>,
        predicate: ClassificationPredicate,
    ) -> Self {
        Self {
            source,
            resolver,
            predicate,
        }
    }

    /// Sampler over the native process table (procfs on Linux, sysinfo on
    /// macOS and Windows) with the command-line strategy of this platform.
    pub fn for_current_platform(predicate: ClassificationPredicate) -> Self {
        Self::new(
            platform_source(Path::new(DEFAULT_PROC_ROOT)),
            platform_resolver(),
            predicate,
        )
    }

    /// Runs one sampling pass.
    ///
    /// `verbose` shows the full command line in each report row instead of
    /// the executable path.
    pub fn sample(&self, verbose: bool) -> Result<AggregateReport, SampleError> {
        let pids = self.source.pids().map_err(SampleError::Enumeration)?;
        debug!("Scanning {} processes", pids.len());

        let mut lines = Vec::new();
        for pid in pids {
            let exe = match self.source.exe(pid) {
                Ok(exe) => exe,
                Err(e) => {
                    trace!(pid, error = %e, "Skipping process without readable executable path");
                    continue;
                }
            };
            if !self.predicate.matches_path(&exe) {
                continue;
            }

            let cmdline = self.resolve_cmdline(pid, &exe);
            let memory = self
                .source
                .memory(pid)
                .map_err(|source| SampleError::MetricReadFailure {
                    pid,
                    exe: exe.clone(),
                    source,
                })?;

            let snapshot = ProcessSnapshot {
                pid,
                exe,
                cmdline,
                rss: memory.rss,
                uss: memory.uss,
            };
            let command_line = snapshot.command_line();
            let role = self.predicate.classify(&command_line);
            debug!(
                pid,
                %role,
                rss = snapshot.rss,
                uss = snapshot.uss,
                cmdline = %command_line,
                "Matched process"
            );
            lines.push(ProcessLine::from_snapshot(&snapshot, role, verbose));
        }

        let report = AggregateReport::new(lines)?;
        info!(
            "Sampled {} processes: parent RSS {} + children USS {} = {} bytes",
            report.processes().len(),
            report.parent_rss(),
            report.children_uss(),
            report.total()
        );
        Ok(report)
    }

    /// Resolves the command line, never giving up on a matched process.
    fn resolve_cmdline(&self, pid: u32, exe: &str) -> Vec<String> {
        match self.resolver.resolve(self.source.as_ref(), pid) {
            Some(cmdline) => cmdline,
            None => {
                debug!(pid, resolver = self.resolver.name(), "Falling back to executable path");
                vec![exe.to_string()]
            }
        }
    }
}
