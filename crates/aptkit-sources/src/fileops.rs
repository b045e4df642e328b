//! Crash-safe file replacement

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SourcesError;

/// Suffix of the fully written replacement
pub const NEW_SUFFIX: &str = ".new";
/// Suffix of the pre-edit backup kept after a rewrite
pub const BACKUP_SUFFIX: &str = ".save";

/// Filesystem primitives used by [`replace_file`]
pub trait FileOps: Send + Sync {
    /// Create or truncate `path` with `contents`
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Atomically rename `from` to `to`
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileOps`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// `path` with `suffix` appended to the file name
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Removes the temporary replacement unless it was moved into place
struct TempGuard<'a> {
    ops: &'a dyn FileOps,
    path: &'a Path,
    armed: bool,
}

impl Drop for TempGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.ops.remove_file(self.path).is_ok() {
            debug!(path = %self.path.display(), "removed temporary file");
        }
    }
}

/// Replace the content of `path` without ever leaving it truncated
///
/// Writes `<path>.new`, moves the original to `<path>.save`, then moves
/// the replacement into place. If the last step fails the backup is
/// renamed back. `<path>.save` is left behind on success.
///
/// # Errors
/// Returns an error naming the failed step and path.
pub fn replace_file(ops: &dyn FileOps, path: &Path, contents: &[u8]) -> Result<(), SourcesError> {
    let new_path = with_suffix(path, NEW_SUFFIX);
    let backup_path = with_suffix(path, BACKUP_SUFFIX);

    let mut guard = TempGuard {
        ops,
        path: &new_path,
        armed: true,
    };

    ops.write(&new_path, contents)
        .map_err(|source| SourcesError::Write {
            path: new_path.clone(),
            source,
        })?;

    ops.rename(path, &backup_path)
        .map_err(|source| SourcesError::Backup {
            path: path.to_path_buf(),
            source,
        })?;

    if let Err(source) = ops.rename(&new_path, path) {
        if let Err(restore) = ops.rename(&backup_path, path) {
            warn!(
                path = %path.display(),
                backup = %backup_path.display(),
                error = %restore,
                "failed to restore backup"
            );
        }
        return Err(SourcesError::Rename {
            from: new_path.clone(),
            to: path.to_path_buf(),
            source,
        });
    }

    guard.armed = false;
    debug!(path = %path.display(), backup = %backup_path.display(), "file replaced");
    Ok(())
}
