//! Setup template command implementation.
//!
//! Writes the built-in setup in YAML, JSON or TOML.

use std::fs;
use std::path::PathBuf;

use procmem_sampler::setup::{SetupFormat, BUILTIN_SETUP};
use procmem_sampler::SetupFile;

use crate::cli::ConfigFormat;

/// Generates a setup file from the built-in one.
pub fn command_setup_template(
    output: Option<PathBuf>,
    format: ConfigFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (format, default_name) = match format {
        ConfigFormat::Yaml => (SetupFormat::Yaml, "procmem-setup.yaml"),
        ConfigFormat::Json => (SetupFormat::Json, "procmem-setup.json"),
        ConfigFormat::Toml => (SetupFormat::Toml, "procmem-setup.toml"),
    };
    let output = output.unwrap_or_else(|| PathBuf::from(default_name));

    // The embedded YAML keeps its comments; other formats are re-rendered
    let content = match format {
        SetupFormat::Yaml => BUILTIN_SETUP.to_string(),
        other => SetupFile::builtin()?.render(other)?,
    };

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Setup written to: {}", output.display());
    }

    Ok(())
}
