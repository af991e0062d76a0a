//! Current-repository config
//!
//! Config file: ~/.devereux/config.yaml
//!
//! ```yaml
//! current_repository: personal
//! ```

use devereux_core::fs as private_fs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Persisted settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Repository used when none is named explicitly
    #[serde(default)]
    pub current_repository: String,
}

impl Config {
    /// The current repository, if one is set
    pub fn current(&self) -> Option<&str> {
        if self.current_repository.is_empty() {
            None
        } else {
            Some(self.current_repository.as_str())
        }
    }
}

/// Reads and writes the config file
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config; a missing or empty file is the default config
    pub fn load(&self) -> Result<Config> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(StoreError::ConfigIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&content).map_err(|source| StoreError::ConfigFormat {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the config file
    pub fn save(&self, config: &Config) -> Result<()> {
        let content = serde_yaml::to_string(config).map_err(StoreError::Serialize)?;

        private_fs::write_private(&self.path, content.as_bytes()).map_err(|source| {
            StoreError::ConfigIo {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!(current = %config.current_repository, "saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::new(&tmp.path().join("config.yaml"));

        let config = store.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.current(), None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "").unwrap();

        assert_eq!(ConfigStore::new(&path).load().unwrap(), Config::default());
    }

    #[test]
    fn test_save_load() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::new(&tmp.path().join("config.yaml"));

        let config = Config {
            current_repository: "personal".to_string(),
        };
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.current(), Some("personal"));
    }

    #[test]
    fn test_save_truncates() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::new(&tmp.path().join("config.yaml"));

        store
            .save(&Config {
                current_repository: "a-rather-long-repository-name".to_string(),
            })
            .unwrap();
        store
            .save(&Config {
                current_repository: "short".to_string(),
            })
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.trim(), "current_repository: short");
    }

    #[test]
    fn test_reads_legacy_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "current_repository: work\n").unwrap();

        assert_eq!(ConfigStore::new(&path).load().unwrap().current(), Some("work"));
    }

    #[test]
    fn test_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "current_repository: [unclosed\n").unwrap();

        assert!(matches!(
            ConfigStore::new(&path).load(),
            Err(StoreError::ConfigFormat { .. })
        ));
    }
}
