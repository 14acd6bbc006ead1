//! Atomic output writes.
//!
//! The page is written to a temp file next to the target, synced, then
//! renamed over it. If anything fails the temp file is removed on drop and
//! the target keeps its previous contents (or stays absent).
//!
//! An existing target keeps its permissions; a new one gets the usual
//! `0o666` minus umask, like a plain `File::create`.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::info;

use crate::error::{Error, Result};

/// Write `contents` to `path`, replacing any existing file atomically.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut builder = Builder::new();
    builder.prefix(".airlift-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Passed to open(2), so the umask still applies.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder.tempfile_in(dir).map_err(write_err)?;

    if let Ok(existing) = fs::metadata(path)
        && existing.is_file()
    {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }

    temp.write_all(contents.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), bytes = contents.len(), "wrote");
    Ok(())
}
