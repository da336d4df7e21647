//! The aggregation file (`subsys.inc`) that wires every subsystem header into the application.
//!
//! Entries are only ever appended. Duplicates are neither detected nor removed.

use crate::error::{ScaffoldError, ScaffoldErrorExt};
use crate::name::{FILE_PREFIX, HEADER_EXTENSION, SubsystemName};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default registry file name, relative to the project root.
pub const REGISTRY_FILE: &str = "subsys.inc";

const LINE_TERMINATOR: u8 = b'\n';

/// One `#include "subsys-<name>.h"` line found in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// 1-based line number in the registry file.
    pub line: usize,
    pub subsystem: String,
    pub header: String,
}

/// Handle to an existing registry file.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    /// Opens the registry at `path`. The file is never created here.
    ///
    /// The file is read once so that an unreadable registry is reported before
    /// anything else is written. Its contents are treated as raw bytes.
    ///
    /// # Errors
    /// Returns [`ScaffoldError::RegistryMissing`] if `path` is not an existing file,
    /// or [`ScaffoldError::Io`] if it cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScaffoldError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ScaffoldError::RegistryMissing { path });
        }
        let contents = read_registry(&path)?;
        debug!(path = %path.display(), bytes = contents.len(), "Registry found");
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends the include directive for `name` and rewrites the file in full.
    ///
    /// Returns the appended directive without its line terminator.
    ///
    /// # Errors
    /// Returns [`ScaffoldError::Io`] if the file cannot be read or rewritten.
    pub fn append(&self, name: &SubsystemName) -> Result<String, ScaffoldError> {
        let contents = read_registry(&self.path)?;

        let directive = name.include_directive();
        fs::write(&self.path, append_directive(&contents, &directive))
            .context(format!("Failed to rewrite registry {}", self.path.display()))?;

        info!(path = %self.path.display(), %directive, "Registered subsystem");
        Ok(directive)
    }

    /// Lists every subsystem directive in file order.
    ///
    /// Bytes that are not UTF-8 are replaced before parsing.
    ///
    /// # Errors
    /// Returns [`ScaffoldError::Io`] if the file cannot be read.
    pub fn entries(&self) -> Result<Vec<RegistryEntry>, ScaffoldError> {
        let contents = read_registry(&self.path)?;
        Ok(parse_entries(&String::from_utf8_lossy(&contents)))
    }
}

fn read_registry(path: &Path) -> Result<Vec<u8>, ScaffoldError> {
    fs::read(path).context(format!("Failed to read registry {}", path.display()))
}

/// Returns `contents` with `directive` appended on its own line.
///
/// A missing terminator on the last existing line is added first. Existing
/// bytes are kept as they are, whatever their encoding.
#[must_use]
pub fn append_directive(contents: &[u8], directive: &str) -> Vec<u8> {
    let mut updated = Vec::with_capacity(contents.len() + directive.len() + 2);
    updated.extend_from_slice(contents);
    if contents.last().is_some_and(|&b| b != LINE_TERMINATOR) {
        updated.push(LINE_TERMINATOR);
    }
    updated.extend_from_slice(directive.as_bytes());
    updated.push(LINE_TERMINATOR);
    updated
}

/// Extracts subsystem entries from registry text, skipping any other line.
#[must_use]
pub fn parse_entries(contents: &str) -> Vec<RegistryEntry> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let header = line.trim().strip_prefix("#include")?.trim_start();
            let header = header.strip_prefix('"')?.strip_suffix('"')?;
            let subsystem = header
                .strip_prefix(FILE_PREFIX)?
                .strip_suffix(HEADER_EXTENSION)?
                .strip_suffix('.')?;
            if subsystem.is_empty() {
                return None;
            }
            Some(RegistryEntry {
                line: idx + 1,
                subsystem: subsystem.to_owned(),
                header: header.to_owned(),
            })
        })
        .collect()
}
