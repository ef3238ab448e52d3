//! Error types for a sampling pass.
//!
//! Only conditions that invalidate the whole pass live here. Processes that
//! vanish or deny access before they pass the path filter are skipped and
//! never surface as errors.

use std::io;

/// Fatal outcome of a single call to [`crate::Sampler::sample`].
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// The path filter matched nothing: the application is not running or the
    /// filter points at the wrong binary.
    #[error("No processes matched the path filter (is the application running?)")]
    NoProcessMatch,

    /// Children were found but none of them satisfied the parent filter.
    #[error(
        "No process matched the parent filter ({children} child process(es) matched the path filter; \
         check the parent filter)"
    )]
    NoParentMatch { children: usize },

    /// A process passed the path filter but its memory could not be read.
    #[error("Failed to read memory metrics for pid {pid} ({exe}): {source}")]
    MetricReadFailure {
        pid: u32,
        exe: String,
        #[source]
        source: io::Error,
    },

    /// The process table itself could not be listed.
    #[error("Failed to enumerate processes: {0}")]
    Enumeration(#[source] io::Error),
}
