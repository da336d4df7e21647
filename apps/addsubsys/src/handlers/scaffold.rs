use anyhow::Result;
use ssgen_scaffold::{ScaffoldConfig, ScaffoldPlan, SubsystemName};
use std::path::Path;

/// Creates `subsys-<name>.h` and `subsys-<name>.cpp` under `root` and registers the header.
///
/// With `dry_run` every precondition is still checked, but the planned writes are only printed.
///
/// # Errors
/// Returns an error if the name is not a valid identifier, a target file already
/// exists, the registry is missing, or a write fails.
pub fn create_subsystem(
    root: &Path,
    raw_name: &str,
    config: &ScaffoldConfig,
    dry_run: bool,
) -> Result<()> {
    let name = SubsystemName::parse(raw_name)?;
    let plan = ScaffoldPlan::prepare(root, name, config)?;

    if dry_run {
        println!("🔍 Dry run for subsystem '{}', nothing was written:", plan.name());
        for file in plan.files() {
            println!("   create {} ({} bytes)", file.path.display(), file.contents.len());
        }
        println!("   append {} to {}", plan.directive(), plan.registry_path().display());
        return Ok(());
    }

    let outcome = plan.commit()?;

    println!("✅ Created subsystem '{}'", outcome.name);
    println!("   {}", outcome.header.display());
    println!("   {}", outcome.source.display());
    println!("   {} += {}", outcome.registry.display(), outcome.directive);
    Ok(())
}
