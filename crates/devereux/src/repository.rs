//! Repository store
//!
//! A repository is one named file holding a YAML list of name/password
//! entries, padded and encrypted. Nothing is cached between calls: every
//! operation reads the file, works on a fresh [`Repository`], and writes it
//! back.

use devereux_core::{fs as private_fs, Paths};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{Result, StoreError};
use crate::kdf::KEY_LEN;
use crate::padding;

/// A single stored password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub name: String,
    pub password: String,
}

/// Decrypted contents of a repository file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub name: String,
    pub entries: Vec<PasswordEntry>,
}

impl Repository {
    /// An empty repository
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: vec![],
        }
    }

    /// Parse serialized entries
    pub fn parse(data: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(data).map_err(StoreError::CorruptOrWrongKey)
    }

    /// Serialize for storage
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_yaml::to_string(self)
            .map(String::into_bytes)
            .map_err(StoreError::Serialize)
    }

    /// Look up a password by entry name, first match wins
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.password.as_str())
    }

    /// Insert or replace an entry.
    ///
    /// Every entry with a matching name is replaced in place; if none match the
    /// entry is appended. Returns true if something was replaced.
    pub fn upsert(&mut self, name: &str, password: &str) -> bool {
        let mut updated = false;
        for entry in self.entries.iter_mut().filter(|e| e.name == name) {
            *entry = PasswordEntry {
                name: name.to_string(),
                password: password.to_string(),
            };
            updated = true;
        }

        if !updated {
            self.entries.push(PasswordEntry {
                name: name.to_string(),
                password: password.to_string(),
            });
        }

        updated
    }

    /// Entry names in stored order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// File-backed store for all repositories under one directory
pub struct RepositoryStore {
    /// Directory holding one file per repository
    repos_dir: PathBuf,
    /// Padded payload size before encryption
    min_size: usize,
}

impl RepositoryStore {
    /// Create a store over the repository directory in `paths`
    pub fn new(paths: &Paths) -> Self {
        Self {
            repos_dir: paths.repos.clone(),
            min_size: padding::MIN_SIZE,
        }
    }

    /// Override the padded container size
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Validate a repository name before it becomes a path
    fn validate_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidName(
                "Name cannot be empty".to_string(),
            ));
        }

        if name.starts_with('.') {
            return Err(StoreError::InvalidName(format!(
                "Name cannot start with '.': {}",
                name
            )));
        }

        for c in name.chars() {
            if !c.is_alphanumeric() && !matches!(c, '_' | '-' | '.' | '@' | '+') {
                return Err(StoreError::InvalidName(format!(
                    "Invalid character '{}' in name",
                    c
                )));
            }
        }

        Ok(())
    }

    /// Get the path for a repository file
    fn repository_path(&self, name: &str) -> Result<PathBuf> {
        self.validate_name(name)?;
        Ok(self.repos_dir.join(name))
    }

    /// Check if a repository exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let path = self.repository_path(name)?;
        Ok(private_fs::exists(&path)?)
    }

    /// Create a new repository holding no entries
    pub fn create(&self, name: &str, key: &[u8; KEY_LEN]) -> Result<()> {
        let path = self.repository_path(name)?;

        if private_fs::exists(&path)? {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        match private_fs::create_exclusive(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = self.save(name, key, &Repository::new(name)) {
            // Don't leave an empty placeholder behind
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        info!(repository = name, "created repository");
        Ok(())
    }

    /// Decrypt and parse a repository
    pub fn load(&self, name: &str, key: &[u8; KEY_LEN]) -> Result<Repository> {
        let path = self.repository_path(name)?;

        let container = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if container.is_empty() {
            return Err(StoreError::EmptyRepository(name.to_string()));
        }

        let payload = codec::decrypt(key, &container)?;
        let data = padding::unpad(&payload)?;

        let mut repository = Repository::parse(data)?;
        repository.name = name.to_string();

        debug!(
            repository = name,
            entries = repository.entries.len(),
            "loaded repository"
        );
        Ok(repository)
    }

    /// Serialize, pad, encrypt and write a repository
    pub fn save(&self, name: &str, key: &[u8; KEY_LEN], repository: &Repository) -> Result<()> {
        let path = self.repository_path(name)?;

        let data = repository.to_bytes()?;
        let padded = padding::pad(&data, self.min_size)?;
        let container = codec::encrypt(key, &padded);

        private_fs::write_private(&path, &container)
            .map_err(|source| StoreError::WriteFailed { path, source })?;

        debug!(
            repository = name,
            entries = repository.entries.len(),
            "saved repository"
        );
        Ok(())
    }

    /// Retrieve a password
    pub fn get_password(&self, name: &str, key: &[u8; KEY_LEN], password_name: &str) -> Result<String> {
        let repository = self.load(name, key)?;

        repository
            .get(password_name)
            .map(str::to_string)
            .ok_or_else(|| StoreError::PasswordNotFound(password_name.to_string()))
    }

    /// Store a password, replacing any entry of the same name
    pub fn set_password(
        &self,
        name: &str,
        key: &[u8; KEY_LEN],
        password_name: &str,
        password: &str,
    ) -> Result<()> {
        let mut repository = self.load(name, key)?;

        let replaced = repository.upsert(password_name, password);
        self.save(name, key, &repository)?;

        debug!(repository = name, replaced, "stored password");
        Ok(())
    }

    /// Entry names of a repository, in stored order
    pub fn entry_names(&self, name: &str, key: &[u8; KEY_LEN]) -> Result<Vec<String>> {
        let repository = self.load(name, key)?;
        Ok(repository.names().into_iter().map(str::to_string).collect())
    }

    /// Delete a repository file
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.repository_path(name)?;

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(repository = name, "deleted repository");
        Ok(())
    }

    /// List repository names, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.repos_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut names = vec![];
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            // Hidden files are in-flight saves
            if name.starts_with('.') {
                continue;
            }

            if let Err(e) = self.validate_name(&name) {
                warn!(repository = %name, error = %e, "repository name cannot be opened, rename the file");
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }
}
