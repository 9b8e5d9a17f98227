//! Generator configuration file.
//!
//! The configuration is read from `date-codegen.toml` in the working
//! directory (or an explicit path). Relative paths inside it are resolved
//! against the directory holding the file:
//! ```toml
//! schema_file = "openapi.yaml"
//! output_file = "src/lib/dates.ts"
//! types = ["Order", "Pet"]
//! require_all_properties = true
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::openapi::GenerateOptions;

/// Config filename looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "date-codegen.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of a config file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// OpenAPI document (JSON or YAML)
    pub schema_file: Option<PathBuf>,
    /// Where the generated TypeScript goes; stdout when absent
    pub output_file: Option<PathBuf>,
    /// Component types to generate transforms for
    pub types: Vec<String>,
    pub all_types: bool,
    pub include_operations: bool,
    pub require_all_properties: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema_file: None,
            output_file: None,
            types: Vec::new(),
            all_types: false,
            include_operations: true,
            require_all_properties: false,
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from TOML text. `path` is only used in error messages.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file, resolving its relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&contents, path)?;

        if let Some(base) = path.parent() {
            config.schema_file = config.schema_file.map(|p| base.join(p));
            config.output_file = config.output_file.map(|p| base.join(p));
        }

        debug!(path = %path.display(), "Loaded generator config.");
        Ok(config)
    }

    /// Load `date-codegen.toml` from `dir` if it exists, otherwise defaults.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            debug!(dir = %dir.display(), "No config file found, using defaults.");
            Ok(Self::default())
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            require_all_properties: self.require_all_properties,
            types: self.types.clone(),
            all_types: self.all_types,
            include_operations: self.include_operations,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_toml("", Path::new("empty.toml")).unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.generate_options(), GenerateOptions::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let config = GeneratorConfig::from_toml(
            r#"
schema_file = "openapi.json"
output_file = "out/dates.ts"
types = ["Order", "Pet"]
all_types = false
include_operations = false
require_all_properties = true
"#,
            Path::new("date-codegen.toml"),
        )
        .unwrap();

        let options = config.generate_options();
        assert_eq!(options.types, ["Order", "Pet"]);
        assert!(!options.include_operations);
        assert!(options.require_all_properties);
        assert_eq!(config.schema_file, Some(PathBuf::from("openapi.json")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = GeneratorConfig::from_toml("schema = \"a.json\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "schema_file = \"api/openapi.yaml\"\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(
            config.schema_file,
            Some(temp_dir.path().join("api").join("openapi.yaml"))
        );
        assert_eq!(config.output_file, None);
    }

    #[test]
    fn test_discover_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = GeneratorConfig::discover(temp_dir.path()).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = GeneratorConfig::load(&temp_dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
