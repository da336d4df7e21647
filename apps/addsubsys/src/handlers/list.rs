use crate::services::output::render_registry_table;
use anyhow::Result;
use ssgen_scaffold::{Registry, ScaffoldConfig};
use std::path::Path;

/// Lists the subsystems registered in the project's registry file.
///
/// # Result
/// Returns `Ok(())` after printing the table (or a friendly empty-state message).
///
/// # Errors
/// Returns an error if the registry is missing or cannot be read.
pub fn list_subsystems(root: &Path, config: &ScaffoldConfig) -> Result<()> {
    let registry = Registry::open(root.join(&config.registry))?;
    let entries = registry.entries()?;

    if entries.is_empty() {
        println!("ℹ️ No subsystems registered in '{}'.", registry.path().display());
        return Ok(());
    }

    render_registry_table(registry.path(), &entries);

    Ok(())
}
