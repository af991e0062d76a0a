//! devereux core - Shared filesystem plumbing for the devereux tools
//!
//! Where repositories live on disk, and how secret-bearing files are written.

pub mod fs;
pub mod paths;

pub use paths::Paths;
