//! CLI command implementations for procmem-sampler.
//!
//! This module provides implementations for all CLI subcommands:
//! - `sample`: One sampling pass, report on stdout
//! - `measure`: Settle wait plus out-of-process (elevated) sampling
//! - `setups`: Configured application listing
//! - `setup_template`: Setup file generation
//! - `check`: System validation

pub mod check;
pub mod measure;
pub mod sample;
pub mod setup_template;
pub mod setups;

// Re-export command functions
pub use check::command_check;
pub use measure::command_measure;
pub use sample::command_sample;
pub use setup_template::command_setup_template;
pub use setups::command_setups;
