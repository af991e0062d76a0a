//! devereux - A command-line password manager
//!
//! Passwords live in named repositories. Each repository is a single file:
//! the entry list, padded with random bytes to a fixed size so the file does
//! not give away how many passwords it holds, then encrypted with AES-256-CFB
//! under a key derived from the repository passphrase.

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod kdf;
pub mod padding;
pub mod prompt;
pub mod repository;

pub use api::Devereux;
pub use config::{Config, ConfigStore};
pub use error::{Result, StoreError};
pub use kdf::{derive_key, RepositoryKey};
pub use repository::{PasswordEntry, Repository, RepositoryStore};
