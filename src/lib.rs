//! Process-tree memory sampler for multi-process applications.
//!
//! Browsers split themselves into one parent process and many child (content,
//! GPU, utility) processes. This library finds the processes of one
//! application, classifies each as parent or child, and sums them into a
//! single comparable figure:
//!
//! - **parent** processes are counted by RSS,
//! - **child** processes are counted by USS, so memory they share with the
//!   parent and with each other is not counted twice.
//!
//! # Usage
//!
//! ```rust,no_run
//! use procmem_sampler::{ClassificationPredicate, Sampler};
//!
//! let predicate = ClassificationPredicate::new(
//!     |exe| exe == "/usr/lib/firefox/firefox",
//!     |cmdline| !cmdline.contains("-contentproc"),
//! );
//! let sampler = Sampler::for_current_platform(predicate);
//!
//! match sampler.sample(false) {
//!     Ok(report) => println!("{}", report),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```
//!
//! Predicates can also come from a setup file (see [`setup`]), which maps an
//! OS and application id to declarative [`matcher::MatcherSpec`] filters.

pub mod elevate;
pub mod error;
pub mod matcher;
pub mod process;
pub mod report;
pub mod sampler;
pub mod setup;

// Re-export main types for convenience
pub use error::SampleError;
pub use process::{ClassificationPredicate, ProcessSource, ProcfsSource, Role, SysinfoSource};
pub use report::{AggregateReport, ProcessLine, ProcessSnapshot};
pub use sampler::Sampler;
pub use setup::{platform_key, AppSetup, SetupError, SetupFile};
