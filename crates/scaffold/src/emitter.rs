use crate::error::{ScaffoldError, ScaffoldErrorExt};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Fails with [`ScaffoldError::Collision`] if anything (even a dangling symlink) sits at `path`.
///
/// # Errors
/// Returns [`ScaffoldError::Collision`] when the path is taken, or
/// [`ScaffoldError::Io`] when its metadata cannot be queried.
pub fn ensure_absent(path: &Path) -> Result<(), ScaffoldError> {
    match fs::symlink_metadata(path) {
        Ok(_) => Err(ScaffoldError::Collision { path: path.to_path_buf() }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Target is free");
            Ok(())
        },
        Err(e) => Err(e).context(format!("Failed to inspect {}", path.display())),
    }
}

/// Writes `contents` as a new file at `path`.
///
/// The file is opened with create-new semantics, so a file created by someone
/// else after [`ensure_absent`] ran is still never overwritten.
///
/// # Errors
/// Returns [`ScaffoldError::Collision`] if the file exists, or
/// [`ScaffoldError::Io`] if it cannot be created or written.
pub fn emit(path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(ScaffoldError::Collision { path: path.to_path_buf() });
        },
        Err(e) => return Err(e).context(format!("Failed to create {}", path.display())),
    };

    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .context(format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}
