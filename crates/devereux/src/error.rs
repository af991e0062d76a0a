//! Error taxonomy for the repository store

use std::path::PathBuf;
use thiserror::Error;

/// Repository store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Password repository already exists: {0}")]
    AlreadyExists(String),

    #[error("Password repository does not exist: {0}")]
    NotFound(String),

    #[error("Repository is invalid. No data in repository: {0}")]
    EmptyRepository(String),

    #[error("Repository is invalid. Container shorter than one cipher block")]
    ContainerTooShort,

    #[error("Repository is invalid. Cannot find boundary (wrong key?)")]
    BoundaryNotFound,

    #[error("Repository could not be read - corrupt, or the key is wrong")]
    CorruptOrWrongKey(#[source] serde_yaml::Error),

    #[error("Repository is too big: {size} bytes of entries, limit is {limit}")]
    RepositoryTooLarge { size: usize, limit: usize },

    #[error("Password name is invalid: {0}")]
    PasswordNotFound(String),

    #[error("Failed to write repository {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Repository is invalid. Not a base64 container: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Invalid repository name: {0}")]
    InvalidName(String),

    #[error("No repository given and no current repository set - use --repo or 'devereux new --default'")]
    NoRepository,

    #[error("Failed to serialize repository: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Config error at {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path:?} is not valid YAML: {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Empty key not allowed")]
    EmptyPassphrase,

    #[error("Failed to read from terminal: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
