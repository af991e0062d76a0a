//! Owner-only file writes
//!
//! Repository containers and the config file both go through here. Writes land
//! in a temporary sibling first and are renamed over the target, so a failed
//! write leaves the previous contents in place.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Replace `path` with `data`, mode 0600
pub fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // NamedTempFile is created 0600
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    debug!(path = %path.display(), bytes = data.len(), "wrote private file");
    Ok(())
}

/// Create an empty file at `path`, failing with `AlreadyExists` if one is there
pub fn create_exclusive(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

/// Check whether `path` exists, surfacing stat failures other than "missing"
pub fn exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
