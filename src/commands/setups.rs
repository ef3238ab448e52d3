//! Setups command implementation.
//!
//! Lists the applications configured for an OS and their filters.

use std::path::Path;

use procmem_sampler::{platform_key, SetupFile};

/// Lists configured applications for `os` (default: the running OS).
pub fn command_setups(
    config: Option<&Path>,
    os: Option<&str>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let setup = SetupFile::load_or_builtin(config)?;
    let os = os.unwrap_or(platform_key());

    println!("📊 procmem-sampler - Configured Applications ({})", os);
    println!("====================================================");

    let apps = setup.platform(os)?;
    for (id, app) in apps {
        println!("\n🏷️  {}", id);
        println!("{}", "─".repeat(50));
        if verbose {
            match &app.binary {
                Some(binary) => println!("   binary:        {}", binary.display()),
                None => println!("   binary:        (not set)"),
            }
        }
        println!("   path filter:   {}", app.path_filter);
        println!("   parent filter: {}", app.parent_filter);
    }

    let others: Vec<&str> = setup.platforms().filter(|p| *p != os).collect();
    if !others.is_empty() {
        println!("\nOther OS keys: {}", others.join(", "));
    }
    Ok(())
}
