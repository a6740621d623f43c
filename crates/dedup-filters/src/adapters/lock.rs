//! Exclusive lock on a snapshot directory
//!
//! Uses `fs2` (flock on Unix, LockFile on Windows). Two processes flushing
//! into the same directory would overwrite each other's snapshots.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::StoreError;

/// Held for as long as a store writes into the directory; released on drop
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
}

impl DataDirLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Take the lock without waiting
    ///
    /// Fails with [`StoreError::Locked`] if another handle holds it.
    pub fn acquire(data_dir: &Path) -> Result<Self, StoreError> {
        let path = data_dir.join(Self::LOCK_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            let holder = std::fs::read_to_string(&path).unwrap_or_default();
            let holder = holder.trim();
            let detail = if holder.is_empty() {
                path.display().to_string()
            } else {
                format!("{} (pid {})", path.display(), holder)
            };
            return Err(StoreError::Locked(detail));
        }

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        file.sync_all()?;

        debug!(path = %path.display(), "Acquired data directory lock");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails() {
        let dir = tempfile::tempdir().unwrap();

        let _lock = DataDirLock::acquire(dir.path()).unwrap();
        let second = DataDirLock::acquire(dir.path());

        assert!(matches!(second, Err(StoreError::Locked(_))));
    }

    #[test]
    fn test_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let lock = DataDirLock::acquire(dir.path()).unwrap();
        let lock_path = lock.path().to_path_buf();
        drop(lock);

        assert!(!lock_path.exists());
        assert!(DataDirLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_lock_file_records_pid() {
        let dir = tempfile::tempdir().unwrap();

        let lock = DataDirLock::acquire(dir.path()).unwrap();
        let contents = std::fs::read_to_string(lock.path()).unwrap();

        assert_eq!(contents.trim(), std::process::id().to_string());
    }
}
