//! Snapshot files on local disk
//!
//! Layout: one `<collection>.bloom` file per collection inside the data
//! directory, plus the `LOCK` file held while the store is open. Saves go
//! through `<collection>.bloom.tmp`, `sync_all` and a rename, so a crash
//! mid-write leaves the previous snapshot intact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::lock::DataDirLock;
use crate::domain::ChainSnapshot;
use crate::error::StoreError;
use crate::ports::SnapshotStore;

const SNAPSHOT_EXTENSION: &str = "bloom";
const TEMP_EXTENSION: &str = "tmp";

/// File-backed [`SnapshotStore`]
#[derive(Debug)]
pub struct FileSnapshotStore {
    dir: PathBuf,
    _lock: DataDirLock,
}

impl FileSnapshotStore {
    /// Open (creating if needed) a data directory and lock it
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let lock = DataDirLock::acquire(&dir)?;

        info!(path = %dir.display(), "Opened snapshot directory");
        Ok(Self { dir, _lock: lock })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SNAPSHOT_EXTENSION))
    }

    fn load_file(path: &Path, stem: &str) -> Result<ChainSnapshot, StoreError> {
        let bytes = fs::read(path)?;
        let snapshot = ChainSnapshot::decode(stem, &bytes)?;
        if snapshot.name != stem {
            return Err(StoreError::Corrupt {
                name: stem.to_string(),
                reason: format!("file holds collection {}", snapshot.name),
            });
        }
        Ok(snapshot)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load_all(&self) -> Result<Vec<ChainSnapshot>, StoreError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some(SNAPSHOT_EXTENSION) => paths.push(path),
                Some(TEMP_EXTENSION) => {
                    // Left behind by an interrupted save.
                    warn!(path = %path.display(), "Removing partial snapshot");
                    fs::remove_file(&path)?;
                }
                _ => {}
            }
        }
        paths.sort();

        let mut snapshots = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "Skipping snapshot with non UTF-8 name");
                continue;
            };
            let snapshot = Self::load_file(&path, stem)?;
            debug!(collection = stem, units = snapshot.units.len(), "Read snapshot");
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }

    fn save(&self, snapshot: &ChainSnapshot) -> Result<(), StoreError> {
        let bytes = snapshot.encode()?;
        let path = self.snapshot_path(&snapshot.name);
        let temp_path = path.with_extension(format!("{}.{}", SNAPSHOT_EXTENSION, TEMP_EXTENSION));

        let mut file = File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, &path)?;

        debug!(
            collection = %snapshot.name,
            bytes = bytes.len(),
            path = %path.display(),
            "Wrote snapshot"
        );
        Ok(())
    }
}
