//! Two-phase scaffolding: every precondition is checked in [`ScaffoldPlan::prepare`],
//! and nothing touches the filesystem until [`ScaffoldPlan::commit`].
//!
//! The commit itself is not transactional. If the registry cannot be rewritten
//! after both files were created, the files are left in place and the error
//! lists them.

use crate::config::ScaffoldConfig;
use crate::emitter::{emit, ensure_absent};
use crate::error::ScaffoldError;
use crate::name::{Namespace, SubsystemName};
use crate::registry::Registry;
use crate::template::{FactoryStyle, render};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file the plan will create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything a scaffold will write, derived from one subsystem name.
#[derive(Debug)]
pub struct ScaffoldPlan {
    name: SubsystemName,
    header: PlannedFile,
    source: PlannedFile,
    registry: Registry,
    directive: String,
}

/// What a successful commit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub name: SubsystemName,
    pub header: PathBuf,
    pub source: PathBuf,
    pub registry: PathBuf,
    pub directive: String,
}

impl ScaffoldPlan {
    /// Validates inputs, checks every target and renders both files.
    ///
    /// # Errors
    /// * [`ScaffoldError::InvalidNamespace`] if the configured namespace is not an identifier.
    /// * [`ScaffoldError::Collision`] if the header or source already exists.
    /// * [`ScaffoldError::RegistryMissing`] if the registry file is absent.
    pub fn prepare(
        root: &Path,
        name: SubsystemName,
        config: &ScaffoldConfig,
    ) -> Result<Self, ScaffoldError> {
        let namespace = Namespace::parse(&config.namespace)?;

        let header_path = root.join(name.header_file());
        let source_path = root.join(name.source_file());
        debug!(header = %header_path.display(), source = %source_path.display(), "Planning scaffold");

        ensure_absent(&header_path)?;
        ensure_absent(&source_path)?;
        let registry = Registry::open(root.join(&config.registry))?;

        let rendered =
            render(&name, &namespace, FactoryStyle::from_legacy_flag(config.legacy_placeholder));
        let directive = name.include_directive();

        Ok(Self {
            name,
            header: PlannedFile { path: header_path, contents: rendered.header },
            source: PlannedFile { path: source_path, contents: rendered.source },
            registry,
            directive,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &SubsystemName {
        &self.name
    }

    /// The files to create, header first.
    #[must_use]
    pub const fn files(&self) -> [&PlannedFile; 2] {
        [&self.header, &self.source]
    }

    #[must_use]
    pub fn registry_path(&self) -> &Path {
        self.registry.path()
    }

    /// The registry line the commit will append, without a line terminator.
    #[must_use]
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Writes the header, then the source, then appends to the registry.
    ///
    /// # Errors
    /// * [`ScaffoldError::Collision`] or [`ScaffoldError::Io`] if a file cannot be
    ///   created; files written before the failure stay on disk.
    /// * [`ScaffoldError::Registry`] if the registry update fails after both files
    ///   were written.
    pub fn commit(self) -> Result<ScaffoldOutcome, ScaffoldError> {
        let mut written = Vec::with_capacity(2);
        for file in self.files() {
            if let Err(err) = emit(&file.path, &file.contents) {
                if !written.is_empty() {
                    warn!(files = ?written, "Scaffold interrupted, earlier files are left in place");
                }
                return Err(err);
            }
            written.push(file.path.clone());
        }

        let directive = match self.registry.append(&self.name) {
            Ok(directive) => directive,
            Err(err) => {
                warn!(files = ?written, "Registry update failed after scaffold files were written");
                return Err(registry_failure(self.registry.path(), written, err));
            },
        };

        info!(subsystem = %self.name, "Subsystem scaffolded");
        Ok(ScaffoldOutcome {
            name: self.name,
            header: self.header.path,
            source: self.source.path,
            registry: self.registry.path().to_path_buf(),
            directive,
        })
    }
}

fn registry_failure(path: &Path, written: Vec<PathBuf>, err: ScaffoldError) -> ScaffoldError {
    match err {
        ScaffoldError::Io { source, context } => {
            ScaffoldError::Registry { path: path.to_path_buf(), written, source, context }
        },
        other => other,
    }
}

/// Plans and commits a scaffold for `raw_name` in one call.
///
/// # Errors
/// Any error of [`SubsystemName::parse`], [`ScaffoldPlan::prepare`] or [`ScaffoldPlan::commit`].
pub fn scaffold(
    root: &Path,
    raw_name: &str,
    config: &ScaffoldConfig,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    let name = SubsystemName::parse(raw_name)?;
    ScaffoldPlan::prepare(root, name, config)?.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn project(registry: Option<&str>) -> TempDir {
        let dir = tempdir().expect("temp dir");
        if let Some(contents) = registry {
            fs::write(dir.path().join("subsys.inc"), contents).expect("registry");
        }
        dir
    }

    #[test]
    fn test_prepare_does_not_touch_the_tree() {
        let dir = project(Some("#include \"a.h\"\n"));
        let name = SubsystemName::parse("foo").expect("valid");

        let plan = ScaffoldPlan::prepare(dir.path(), name, &ScaffoldConfig::default())
            .expect("plan");

        assert_eq!(plan.directive(), "#include \"subsys-foo.h\"");
        assert_eq!(plan.files()[0].path, dir.path().join("subsys-foo.h"));
        assert_eq!(plan.files()[1].path, dir.path().join("subsys-foo.cpp"));
        assert!(!dir.path().join("subsys-foo.h").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("subsys.inc")).expect("registry"),
            "#include \"a.h\"\n"
        );
    }

    #[test]
    fn test_commit_writes_everything() {
        let dir = project(Some("#include \"a.h\"\n"));

        let outcome = scaffold(dir.path(), "foo", &ScaffoldConfig::default()).expect("scaffold");

        assert_eq!(outcome.directive, "#include \"subsys-foo.h\"");
        assert!(outcome.header.is_file());
        assert!(outcome.source.is_file());
        assert_eq!(
            fs::read_to_string(&outcome.registry).expect("registry"),
            "#include \"a.h\"\n#include \"subsys-foo.h\"\n"
        );
    }

    #[test]
    fn test_collision_on_source_writes_nothing() {
        let dir = project(Some(""));
        fs::write(dir.path().join("subsys-foo.cpp"), "keep").expect("seed");

        let err = scaffold(dir.path(), "foo", &ScaffoldConfig::default()).expect_err("collision");

        assert!(matches!(err, ScaffoldError::Collision { .. }));
        assert!(!dir.path().join("subsys-foo.h").exists());
        assert_eq!(fs::read_to_string(dir.path().join("subsys.inc")).expect("registry"), "");
    }

    #[test]
    fn test_missing_registry_fails_before_any_write() {
        let dir = project(None);

        let err = scaffold(dir.path(), "foo", &ScaffoldConfig::default()).expect_err("no registry");

        assert!(matches!(err, ScaffoldError::RegistryMissing { .. }));
        assert!(!dir.path().join("subsys-foo.h").exists());
        assert!(!dir.path().join("subsys-foo.cpp").exists());
        assert!(!dir.path().join("subsys.inc").exists());
    }

    #[test]
    fn test_registry_with_foreign_encoding_is_extended() {
        let dir = tempdir().expect("temp dir");
        let registry = dir.path().join("subsys.inc");
        fs::write(&registry, b"// caf\xe9\n#include \"subsys-a.h\"\n").expect("registry");

        let outcome = scaffold(dir.path(), "foo", &ScaffoldConfig::default()).expect("scaffold");

        assert!(outcome.header.is_file());
        assert!(outcome.source.is_file());
        assert_eq!(
            fs::read(&registry).expect("registry"),
            b"// caf\xe9\n#include \"subsys-a.h\"\n#include \"subsys-foo.h\"\n"
        );
    }

    #[test]
    fn test_invalid_namespace_is_rejected() {
        let dir = project(Some(""));
        let config = ScaffoldConfig { namespace: "bad ns".to_owned(), ..ScaffoldConfig::default() };

        let err = scaffold(dir.path(), "foo", &config).expect_err("namespace");
        assert!(matches!(err, ScaffoldError::InvalidNamespace { .. }));
    }

    #[test]
    fn test_registry_failure_lists_written_files() {
        let path = PathBuf::from("subsys.inc");
        let written = vec![PathBuf::from("subsys-foo.h"), PathBuf::from("subsys-foo.cpp")];
        let io = ScaffoldError::Io {
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            context: Some("rewrite".into()),
        };

        let err = registry_failure(&path, written, io);

        assert!(matches!(err, ScaffoldError::Registry { .. }));
        let message = err.to_string();
        assert!(
            message.starts_with("Failed to update registry subsys.inc (rewrite) (already written"),
            "{message}"
        );
        assert!(message.contains("subsys-foo.h, subsys-foo.cpp"));
    }
}
