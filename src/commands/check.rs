//! Check command implementation.
//!
//! Validates system requirements and the built-in setup.

use std::path::Path;

use procmem_sampler::process::platform_source;
use procmem_sampler::{platform_key, SetupFile};

use crate::startup_checks::validate_requirements;

/// Validates system requirements and configuration.
pub fn command_check(proc_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 procmem-sampler - System Check");
    println!("==================================");

    let mut all_ok = true;

    if cfg!(target_os = "linux") {
        println!("\n📁 Checking {} ...", proc_root.display());
        match validate_requirements(proc_root) {
            Ok(()) => println!("   ✅ Process table readable"),
            Err(e) => {
                println!("   ❌ {}", e);
                all_ok = false;
            }
        }
    }

    println!("\n📋 Listing processes...");
    let source = platform_source(proc_root);
    match source.pids() {
        Ok(pids) if !pids.is_empty() => println!("   ✅ {} processes visible", pids.len()),
        Ok(_) => {
            println!("   ❌ No processes visible");
            all_ok = false;
        }
        Err(e) => {
            println!("   ❌ Process enumeration failed: {}", e);
            all_ok = false;
        }
    }

    println!("\n💾 Checking memory metrics accessibility...");
    let pid = std::process::id();
    match source.memory(pid) {
        Ok(mem) => println!(
            "   ✅ Memory parsing successful: RSS={}MB, USS={}MB",
            mem.rss / 1024 / 1024,
            mem.uss / 1024 / 1024
        ),
        Err(e) => {
            println!("   ❌ Memory parsing failed for own pid {}: {}", pid, e);
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking built-in setup...");
    match SetupFile::builtin() {
        Ok(setup) => match setup.platform(platform_key()) {
            Ok(apps) => {
                let mut compiled = 0;
                for (id, app) in apps {
                    match app.predicate(id) {
                        Ok(_) => compiled += 1,
                        Err(e) => {
                            println!("   ❌ {}", e);
                            all_ok = false;
                        }
                    }
                }
                println!("   ✅ {} application(s) for '{}'", compiled, platform_key());
            }
            Err(e) => println!("   ⚠️  {}", e),
        },
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
