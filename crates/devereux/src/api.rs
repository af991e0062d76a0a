//! Application operations
//!
//! Ties the repository store to the config file: resolves which repository an
//! operation targets, derives its key, and keeps the current-repository
//! pointer in step with creates and deletes.

use devereux_core::Paths;
use tracing::info;

use crate::config::{Config, ConfigStore};
use crate::error::{Result, StoreError};
use crate::kdf::derive_key;
use crate::repository::RepositoryStore;

/// Entry point for every command
pub struct Devereux {
    paths: Paths,
    repositories: RepositoryStore,
    config: ConfigStore,
}

impl Devereux {
    /// Open the store rooted at `paths`, creating its directories if needed
    pub fn open(paths: Paths) -> Result<Self> {
        paths.ensure_dirs()?;

        let repositories = RepositoryStore::new(&paths);
        let config = ConfigStore::new(&paths.config_file);

        Ok(Self {
            paths,
            repositories,
            config,
        })
    }

    /// Override the padded container size
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.repositories = self.repositories.with_min_size(min_size);
        self
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// The repository used when none is named
    pub fn current_repository(&self) -> Result<Option<String>> {
        let config = self.config.load()?;
        Ok(config.current().map(str::to_string))
    }

    /// Use `explicit` if given, else the current repository
    pub fn resolve_repository(&self, explicit: Option<&str>) -> Result<String> {
        match explicit {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => self.current_repository()?.ok_or(StoreError::NoRepository),
        }
    }

    /// Create a repository.
    ///
    /// It becomes the current repository if `set_as_default` is given or no
    /// repository is current yet. Returns whether it became current.
    pub fn create_repository(&self, name: &str, passphrase: &str, set_as_default: bool) -> Result<bool> {
        let mut config = self.config.load()?;
        let key = derive_key(passphrase);

        self.repositories.create(name, &key)?;

        if set_as_default || config.current().is_none() {
            config.current_repository = name.to_string();
            self.config.save(&config)?;
            info!(repository = name, "set current repository");
            return Ok(true);
        }

        Ok(false)
    }

    /// Store a password, returning the repository it went into
    pub fn set_password(
        &self,
        repo: Option<&str>,
        passphrase: &str,
        password_name: &str,
        password: &str,
    ) -> Result<String> {
        let name = self.resolve_repository(repo)?;
        let key = derive_key(passphrase);

        self.repositories
            .set_password(&name, &key, password_name, password)?;
        Ok(name)
    }

    /// Retrieve a password
    pub fn get_password(&self, repo: Option<&str>, passphrase: &str, password_name: &str) -> Result<String> {
        let name = self.resolve_repository(repo)?;
        let key = derive_key(passphrase);

        self.repositories.get_password(&name, &key, password_name)
    }

    /// Entry names of a repository
    pub fn list_entries(&self, repo: Option<&str>, passphrase: &str) -> Result<Vec<String>> {
        let name = self.resolve_repository(repo)?;
        let key = derive_key(passphrase);

        self.repositories.entry_names(&name, &key)
    }

    /// Delete a repository, clearing it as current if it was
    pub fn delete_repository(&self, name: &str) -> Result<()> {
        self.repositories.delete(name)?;

        let config = self.config.load()?;
        if config.current() == Some(name) {
            self.config.save(&Config::default())?;
            info!(repository = name, "cleared current repository");
        }

        Ok(())
    }

    /// All repository names, sorted
    pub fn list_repositories(&self) -> Result<Vec<String>> {
        self.repositories.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_app() -> (Devereux, TempDir) {
        let tmp = TempDir::new().unwrap();
        let app = Devereux::open(Paths::with_base(tmp.path().join("home")))
            .unwrap()
            .with_min_size(4096);
        (app, tmp)
    }

    #[test]
    fn test_open_bootstraps_dirs() {
        let (app, _tmp) = temp_app();
        assert!(app.paths().repos.is_dir());
        assert_eq!(app.current_repository().unwrap(), None);
    }

    #[test]
    fn test_first_repository_becomes_current() {
        let (app, _tmp) = temp_app();

        assert!(app.create_repository("personal", "k", false).unwrap());
        assert!(!app.create_repository("work", "k", false).unwrap());
        assert_eq!(app.current_repository().unwrap().as_deref(), Some("personal"));

        assert!(app.create_repository("shared", "k", true).unwrap());
        assert_eq!(app.current_repository().unwrap().as_deref(), Some("shared"));
    }

    #[test]
    fn test_default_repository_used() {
        let (app, _tmp) = temp_app();
        app.create_repository("personal", "k", false).unwrap();
        app.create_repository("work", "k2", false).unwrap();

        let used = app.set_password(None, "k", "mail", "pw1").unwrap();
        assert_eq!(used, "personal");
        assert_eq!(app.get_password(None, "k", "mail").unwrap(), "pw1");

        app.set_password(Some("work"), "k2", "vpn", "pw2").unwrap();
        assert_eq!(app.get_password(Some("work"), "k2", "vpn").unwrap(), "pw2");
        assert_eq!(app.list_entries(Some("work"), "k2").unwrap(), vec!["vpn"]);
        assert!(matches!(
            app.get_password(None, "k", "vpn"),
            Err(StoreError::PasswordNotFound(_))
        ));
    }

    #[test]
    fn test_no_repository() {
        let (app, _tmp) = temp_app();
        assert!(matches!(
            app.get_password(None, "k", "mail"),
            Err(StoreError::NoRepository)
        ));
        assert!(matches!(
            app.set_password(Some(""), "k", "mail", "pw"),
            Err(StoreError::NoRepository)
        ));
    }

    #[test]
    fn test_delete_clears_current() {
        let (app, _tmp) = temp_app();
        app.create_repository("personal", "k", true).unwrap();

        app.delete_repository("personal").unwrap();
        assert_eq!(app.current_repository().unwrap(), None);
        assert!(app.list_repositories().unwrap().is_empty());
    }

    #[test]
    fn test_delete_other_keeps_current() {
        let (app, _tmp) = temp_app();
        app.create_repository("personal", "k", true).unwrap();
        app.create_repository("work", "k", false).unwrap();

        app.delete_repository("work").unwrap();
        assert_eq!(app.current_repository().unwrap().as_deref(), Some("personal"));
        assert_eq!(app.list_repositories().unwrap(), vec!["personal"]);
    }

    #[test]
    fn test_create_existing_keeps_config() {
        let (app, _tmp) = temp_app();
        app.create_repository("personal", "k", false).unwrap();
        app.create_repository("work", "k", false).unwrap();

        assert!(matches!(
            app.create_repository("work", "k", true),
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(app.current_repository().unwrap().as_deref(), Some("personal"));
    }
}
