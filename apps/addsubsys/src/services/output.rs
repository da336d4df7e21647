use ssgen_scaffold::RegistryEntry;
use std::path::Path;

/// Prints a formatted table of registry entries with their line, subsystem and header.
pub fn render_registry_table(registry: &Path, entries: &[RegistryEntry]) {
    println!("\nSubsystems in {}:\n", registry.display());
    println!("{:<6} {:<24} {:<40}", "Line", "Subsystem", "Header");
    println!("{:-<70}", "");

    for entry in entries {
        println!("{:<6} {:<24} {:<40}", entry.line, entry.subsystem, entry.header);
    }
    println!();
}
