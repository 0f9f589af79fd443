//! File-level orchestration: read, apply, atomically persist.
//!
//! The engine itself never touches disk. This module owns the
//! read -> apply -> write sequence around it: nothing is written unless
//! the whole batch validated and composed, which is what makes a file
//! edit transactional from the caller's side.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::apply::{apply, ApplyError, BatchOutcome};
use crate::edit::EditRequest;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("edit batch rejected: {0}")]
    Apply(#[from] ApplyError),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of applying a batch to a file on disk.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub outcome: BatchOutcome,
    /// False when the batch was a pure no-op and the file was left alone.
    pub written: bool,
}

/// Read a file, apply the batch, and persist the result atomically.
///
/// Pure no-op batches skip the write entirely, so an untouched file keeps
/// its exact bytes even when its line endings are mixed.
pub fn apply_to_file(
    path: impl AsRef<Path>,
    edits: &[EditRequest],
) -> Result<FileOutcome, FileError> {
    let path = path.as_ref();
    let original = fs::read(path)?;
    let outcome = apply(&original, edits)?;

    let written = outcome.first_changed_line.is_some();
    if written {
        atomic_write(path, &outcome.bytes)?;
        // Bump mtime so incremental build tools re-read the file.
        filetime::set_file_mtime(path, filetime::FileTime::now())?;
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        outcome,
        written,
    })
}

/// Atomic file write: tempfile in the target directory, fsync, rename.
///
/// Either the full write succeeds or the original file is untouched.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), FileError> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(p) => p,
        None => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| FileError::Io(e.error))?;

    Ok(())
}
