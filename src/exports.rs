//! Registry export
//!
//! Writes a registry to disk as JSON. The destination is replaced in one
//! step: content goes to a temporary file in the same directory, is synced,
//! and is then renamed over the target. A failed export leaves any existing
//! file untouched.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::Registry;

/// Write `registry` to `path` as pretty-printed UTF-8 JSON
pub fn write_json(path: impl AsRef<Path>, registry: &Registry) -> Result<()> {
    let path = path.as_ref();
    let content = registry.to_json_pretty()?;
    write_atomic(path, content.as_bytes())
}

/// Replace the file at `path` with `bytes`, all or nothing
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropping the temp file on any early return removes it
    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote output file");
    Ok(())
}
