use crate::{error::SluiceError, status::StatusPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{
    fs::{read_to_string, write},
    path::PathBuf,
};

/// Presentation defaults the editor shell passes into the core explicitly.
/// Keeping them out of the load/status code paths lets callers vary and
/// test them independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorDefaults {
    /// Display name assigned at load time to a stream processor whose
    /// persisted name is empty. Never written back to the pipeline.
    pub stream_placeholder: String,
    pub status: StatusPolicy,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        EditorDefaults {
            stream_placeholder: "Untitled stream app".to_string(),
            status: StatusPolicy::default(),
        }
    }
}

pub trait DefaultsProvider: Send + Sync {
    fn get_defaults(&self) -> Result<EditorDefaults, SluiceError>;
    fn set_defaults(&self, defaults: EditorDefaults) -> Result<(), SluiceError>;
}

/// File-backed provider for the embedding shell. The core itself never
/// touches the filesystem; it receives an [EditorDefaults] value per call.
#[derive(Debug, Serialize, Deserialize)]
pub struct TomlDefaultsProvider {
    path: PathBuf,
}

impl TomlDefaultsProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlDefaultsProvider { path }
    }
}

impl DefaultsProvider for TomlDefaultsProvider {
    fn get_defaults(&self) -> Result<EditorDefaults, SluiceError> {
        tracing::debug!("Attempting to read editor defaults from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Defaults file not found, using built-in defaults.");
            return Ok(EditorDefaults::default());
        }
        let content = read_to_string(&self.path)?;
        let config: BTreeMap<String, EditorDefaults> = toml::from_str(&content)?;
        config
            .get("editor")
            .cloned()
            .ok_or_else(|| SluiceError::NotFound("editor table not found in config".to_string()))
    }

    fn set_defaults(&self, defaults: EditorDefaults) -> Result<(), SluiceError> {
        tracing::debug!("Attempting to write editor defaults to: {:?}", &self.path);
        let mut config = BTreeMap::new();
        config.insert("editor".to_string(), defaults);
        let toml_string = toml::to_string(&config)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_log::test;

    #[test]
    fn test_missing_file_yields_builtin_defaults() {
        let dir = TempDir::new().unwrap();
        let provider = TomlDefaultsProvider::new(dir.path().join("absent.toml"));
        let defaults = provider.get_defaults().unwrap();
        assert_eq!(defaults, EditorDefaults::default());
        assert_eq!(defaults.stream_placeholder, "Untitled stream app");
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let provider = TomlDefaultsProvider::new(dir.path().join("editor.toml"));

        let defaults = EditorDefaults {
            stream_placeholder: "unnamed app".to_string(),
            status: StatusPolicy { min_running: 3 },
        };
        provider.set_defaults(defaults.clone()).unwrap();

        assert_eq!(provider.get_defaults().unwrap(), defaults);
    }
}
