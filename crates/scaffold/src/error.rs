use std::borrow::Cow;
use std::path::PathBuf;

/// Errors raised while planning or writing a subsystem scaffold.
#[ssgen_derive::scaffold_error]
pub enum ScaffoldError {
    /// The subsystem name cannot be used as a file name or C++ identifier.
    #[error("Invalid subsystem name '{name}': {reason}")]
    InvalidName { name: String, reason: Cow<'static, str> },

    /// The configured namespace cannot be used as a C++ identifier.
    #[error("Invalid namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: Cow<'static, str> },

    /// A file the scaffold would create is already present.
    #[error("File already exists: {}", .path.display())]
    Collision { path: PathBuf },

    /// The registry file is absent. It is never created implicitly.
    #[error("Registry file not found: {}", .path.display())]
    RegistryMissing { path: PathBuf },

    /// Reading or rewriting the registry failed after the scaffold files were written.
    #[error(
        "Failed to update registry {}{}{}: {source}",
        .path.display(),
        format_context(.context),
        format_written(.written)
    )]
    Registry {
        path: PathBuf,
        written: Vec<PathBuf>,
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Any other filesystem failure.
    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The configuration file or an environment override is malformed.
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

fn format_written(written: &[PathBuf]) -> Cow<'static, str> {
    if written.is_empty() {
        return Cow::Borrowed("");
    }
    let files = written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");
    Cow::Owned(format!(" (already written, not rolled back: {files})"))
}
