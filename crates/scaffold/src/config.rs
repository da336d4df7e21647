use crate::error::{ScaffoldError, ScaffoldErrorExt};
use crate::name::Namespace;
use crate::registry::REGISTRY_FILE;
use config::{Config, Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE: &str = "addsubsys.toml";

/// Prefix of environment overrides, e.g. `ADDSUBSYS__NAMESPACE=server`.
pub const ENV_PREFIX: &str = "ADDSUBSYS";

/// Settings that shape a scaffold. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Registry file, relative to the project root unless absolute.
    pub registry: PathBuf,
    /// Inner namespace below `msctl`.
    pub namespace: String,
    /// Reproduce the historical unreplaced `%%ss-name` in the factory body.
    pub legacy_placeholder: bool,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            registry: PathBuf::from(REGISTRY_FILE),
            namespace: Namespace::DEFAULT.to_owned(),
            legacy_placeholder: false,
        }
    }
}

/// Loads the scaffold configuration for the project at `root`.
///
/// Layers, last one wins:
/// 1. **Defaults**: see [`ScaffoldConfig::default`].
/// 2. **File**: `explicit` if given (must exist), otherwise `<root>/addsubsys.toml` if present.
/// 3. **Environment**: process variables prefixed with `ADDSUBSYS__`.
///
/// # Errors
/// Returns [`ScaffoldError::Config`] if an explicit file is missing, the file is
/// not valid TOML, or a value does not match its key's type.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<ScaffoldConfig, ScaffoldError> {
    load_config_with_env(root, explicit, None)
}

/// Same as [`load_config`], but reads the environment layer from `vars`
/// instead of the process environment when given.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env(
    root: &Path,
    explicit: Option<&Path>,
    vars: Option<Map<String, String>>,
) -> Result<ScaffoldConfig, ScaffoldError> {
    let (path, required) =
        explicit.map_or_else(|| (root.join(CONFIG_FILE), false), |p| (p.to_path_buf(), true));

    debug!(path = %path.display(), required, "Loading configuration");

    let config = Config::builder()
        .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true).source(vars),
        )
        .build()
        .context(format!("Failed to read {}", path.display()))?
        .try_deserialize::<ScaffoldConfig>()
        .context("Failed to deserialize configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let cfg = load_config_with_env(dir.path(), None, Some(Map::new()))?;
        assert_eq!(cfg.registry, PathBuf::from("subsys.inc"));
        assert_eq!(cfg.namespace, "agent");
        assert!(!cfg.legacy_placeholder);
        Ok(())
    }

    #[test]
    fn test_project_file_overrides_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(CONFIG_FILE),
            "namespace = \"server\"\nlegacy_placeholder = true\nregistry = \"include/subsys.inc\"\n",
        )?;

        let cfg = load_config_with_env(dir.path(), None, Some(Map::new()))?;
        assert_eq!(cfg.namespace, "server");
        assert!(cfg.legacy_placeholder);
        assert_eq!(cfg.registry, PathBuf::from("include/subsys.inc"));
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let missing = dir.path().join("nope.toml");
        let err = load_config_with_env(dir.path(), Some(&missing), Some(Map::new()))
            .expect_err("explicit file must exist");
        assert!(matches!(err, ScaffoldError::Config { context: Some(_), .. }));
        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("custom.toml");
        fs::write(&path, "namepsace = \"server\"\n")?;

        let err = load_config_with_env(dir.path(), Some(&path), Some(Map::new()))
            .expect_err("typo must be reported");
        assert!(err.to_string().starts_with("Configuration error (Failed to deserialize"));
        Ok(())
    }

    #[test]
    fn test_environment_overrides_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join(CONFIG_FILE), "namespace = \"server\"\n")?;
        let vars = Map::from([
            ("ADDSUBSYS__NAMESPACE".to_owned(), "relay".to_owned()),
            ("ADDSUBSYS__LEGACY_PLACEHOLDER".to_owned(), "true".to_owned()),
        ]);

        let cfg = load_config_with_env(dir.path(), None, Some(vars))?;
        assert_eq!(cfg.namespace, "relay");
        assert!(cfg.legacy_placeholder);
        assert_eq!(cfg.registry, PathBuf::from("subsys.inc"));
        Ok(())
    }
}
