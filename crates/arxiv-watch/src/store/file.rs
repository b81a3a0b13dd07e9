//! JSON file backend for the seen-set.

use std::fs::{self, OpenOptions, TryLockError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{SeenStore, StoreLock};
use crate::config::state;
use crate::error::{StateError, StateResult};
use crate::models::SeenSet;

/// Seen-set stored as a sorted, pretty-printed JSON array of strings.
///
/// Writes go to a temp file in the same directory and are renamed over the
/// target, so readers never see a half-written file. Exclusive access is an
/// OS advisory lock on a sibling `<file>.lock`, held for the life of the guard.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/seen.json`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(state::SEEN_FILE))
    }

    /// Path of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the lock file.
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn ensure_dir(&self) -> StateResult<()> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| StateError::write(dir, e))
    }
}

impl SeenStore for JsonFileStore {
    fn load(&self) -> StateResult<SeenSet> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No seen-set file yet, starting empty");
                return Ok(SeenSet::new());
            }
            Err(e) => return Err(StateError::read(&self.path, e)),
        };

        let seen = SeenSet::from_json(&bytes).map_err(|e| StateError::corrupt(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), ids = seen.len(), "Loaded seen-set");
        Ok(seen)
    }

    fn save(&self, seen: &SeenSet) -> StateResult<()> {
        self.ensure_dir()?;

        let json = seen
            .to_json_pretty()
            .map_err(|e| StateError::write(&self.path, std::io::Error::other(e)))?;

        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(|e| StateError::write(&self.path, e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| StateError::write(&self.path, e))?;
        tmp.as_file().sync_all().map_err(|e| StateError::write(&self.path, e))?;
        tmp.persist(&self.path).map_err(|e| StateError::write(&self.path, e.error))?;

        tracing::debug!(path = %self.path.display(), ids = seen.len(), "Saved seen-set");
        Ok(())
    }

    fn lock(&self) -> StateResult<StoreLock> {
        self.ensure_dir()?;

        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StateError::write(&lock_path, e))?;

        // Advisory lock owned by the open file; the OS drops it if the process dies.
        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => return Err(StateError::Locked { path: lock_path }),
            Err(TryLockError::Error(e)) => return Err(StateError::write(&lock_path, e)),
        }
        tracing::debug!(path = %lock_path.display(), "Acquired seen-set lock");

        // The lock file itself stays on disk. Removing it would let a waiting
        // opener lock an unlinked inode while a newcomer locks a fresh one.
        Ok(StoreLock::on_release(move || {
            if let Err(e) = file.unlock() {
                tracing::warn!(path = %lock_path.display(), error = %e, "Failed to release lock");
            }
        }))
    }
}
