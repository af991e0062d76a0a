//! Standard paths used by devereux

use std::fs::DirBuilder;
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::PathBuf;

/// Environment variable that relocates the base directory
pub const HOME_ENV_VAR: &str = "DEVEREUX_HOME";

/// Standard devereux paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Base directory (~/.devereux)
    pub base: PathBuf,
    /// Repository directory (~/.devereux/repos)
    pub repos: PathBuf,
    /// Config file (~/.devereux/config.yaml)
    pub config_file: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    /// Resolve paths from the environment.
    ///
    /// `DEVEREUX_HOME` wins when set and non-empty, otherwise `~/.devereux`.
    pub fn new() -> Self {
        let base = match std::env::var_os(HOME_ENV_VAR) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join(".devereux"),
        };

        Self::with_base(base)
    }

    /// Build the layout under an explicit base directory
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let repos = base.join("repos");
        let config_file = base.join("config.yaml");

        Self {
            base,
            repos,
            config_file,
        }
    }

    /// Get the file path for a repository
    pub fn repository_file(&self, name: &str) -> PathBuf {
        self.repos.join(name)
    }

    /// Create the base and repository directories.
    ///
    /// Directories created here are owner-only; existing ones keep their mode.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(&self.repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let paths = Paths::with_base("/tmp/dvx");
        assert_eq!(paths.repos, PathBuf::from("/tmp/dvx/repos"));
        assert_eq!(paths.config_file, PathBuf::from("/tmp/dvx/config.yaml"));
        assert_eq!(
            paths.repository_file("personal"),
            PathBuf::from("/tmp/dvx/repos/personal")
        );
    }

    #[test]
    fn test_ensure_dirs() -> io::Result<()> {
        let tmp = TempDir::new()?;
        let paths = Paths::with_base(tmp.path().join("home"));

        paths.ensure_dirs()?;
        assert!(paths.repos.is_dir());

        let mode = fs::metadata(&paths.repos)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o700);

        let mode = fs::metadata(&paths.base)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o700);

        // Idempotent
        paths.ensure_dirs()?;
        Ok(())
    }

    #[test]
    fn test_ensure_dirs_keeps_existing_mode() -> io::Result<()> {
        let tmp = TempDir::new()?;
        let shared = tmp.path().join("shared");
        fs::create_dir(&shared)?;
        fs::set_permissions(&shared, Permissions::from_mode(0o755))?;

        let paths = Paths::with_base(&shared);
        paths.ensure_dirs()?;

        let mode = fs::metadata(&shared)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o755);

        let mode = fs::metadata(&paths.repos)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
        Ok(())
    }
}
