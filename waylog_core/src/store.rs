//! Workout snapshot persistence with file locking.
//!
//! The whole workout list is serialized as a single JSON array and
//! overwritten on every save; there is one writer (the controller) and
//! no incremental path. A missing or unreadable snapshot is treated as
//! "no prior workouts", never as an error the caller has to handle.

use crate::{Result, Workout};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE: &str = "workouts.json";

/// Conventional snapshot path for a data directory
pub fn snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SNAPSHOT_FILE)
}

/// Load the workout list from a snapshot file with shared locking
///
/// Returns an empty list if the file doesn't exist.
/// If the file is corrupted, logs a warning and returns an empty list.
pub fn load_workouts(path: &Path) -> Result<Vec<Workout>> {
    if !path.exists() {
        tracing::info!("No workout snapshot found, starting empty");
        return Ok(Vec::new());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(
                "Unable to open snapshot {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(Vec::new());
        }
    };

    // Acquire shared lock for reading
    if let Err(e) = file.lock_shared() {
        tracing::warn!(
            "Unable to lock snapshot {:?}: {}. Starting empty.",
            path,
            e
        );
        return Ok(Vec::new());
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!(
            "Failed to read snapshot {:?}: {}. Starting empty.",
            path,
            e
        );
        return Ok(Vec::new());
    }

    file.unlock()?;

    match serde_json::from_str::<Vec<Workout>>(&contents) {
        Ok(workouts) => {
            tracing::debug!("Loaded {} workouts from {:?}", workouts.len(), path);
            Ok(workouts)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse snapshot {:?}: {}. Starting empty.",
                path,
                e
            );
            Ok(Vec::new())
        }
    }
}

/// Save the full workout list to a snapshot file with exclusive locking
///
/// Atomically overwrites by:
/// 1. Writing to a temp file in the same directory
/// 2. Syncing to disk
/// 3. Renaming over the original
pub fn save_workouts(path: &Path, workouts: &[Workout]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "snapshot path missing parent")
    })?)?;

    // Exclusive lock on the temp file to serialize concurrent writers
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(workouts)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    // Atomically replace the old snapshot
    temp.persist(path).map_err(|e| crate::Error::Io(e.error))?;

    tracing::debug!("Saved {} workouts to {:?}", workouts.len(), path);
    Ok(())
}

/// Delete the snapshot file (the reset maintenance action)
///
/// Returns whether a snapshot existed to be removed.
pub fn clear_workouts(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    tracing::info!("Cleared workout snapshot {:?}", path);
    Ok(true)
}
