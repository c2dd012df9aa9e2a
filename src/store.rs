//! Locked read-merge-write against the shared compilation database.
//!
//! Many recorder instances run concurrently under a parallel build driver,
//! all targeting the same `compile_commands.json`. An exclusive advisory
//! lock held across the whole read-modify-write serializes them, so no
//! update is ever lost. Lock acquisition blocks; there is no timeout and no
//! retry.

use crate::error::RecorderError;
use crate::record::CompileRecord;
use fs2::FileExt;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// Database file name inside the build directory.
pub const DB_FILE_NAME: &str = "compile_commands.json";

/// Merge one record into `<db_dir>/compile_commands.json`.
///
/// Opens or creates the file, takes the exclusive lock, and performs the
/// full read-merge-rewrite before releasing it. Records for other files are
/// carried over untouched; a prior record for the same `file` key is
/// replaced in place.
pub fn merge_record(db_dir: &Path, record: &CompileRecord) -> Result<(), RecorderError> {
    let path = db_dir.join(DB_FILE_NAME);
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(&path)
        .map_err(|e| RecorderError::Open {
            path: path.clone(),
            source: e,
        })?;

    // Blocks until every other writer has finished its own cycle.
    file.lock_exclusive().map_err(|e| RecorderError::Lock {
        path: path.clone(),
        source: e,
    })?;

    let result = merge_locked(&mut file, &path, record);

    // The lock also drops with the handle, so error paths stay covered.
    let _ = FileExt::unlock(&file);
    result
}

fn merge_locked(
    file: &mut File,
    path: &Path,
    record: &CompileRecord,
) -> Result<(), RecorderError> {
    let io_err = |e: std::io::Error| RecorderError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(io_err)?;

    // Parse before touching the file: a malformed database must fail
    // without clobbering whatever is there.
    let mut entries = parse_database(&content, path)?;
    upsert(&mut entries, record)?;

    let serialized = serde_json::to_string(&entries).map_err(RecorderError::Serialize)?;

    file.seek(SeekFrom::Start(0)).map_err(io_err)?;
    file.set_len(0).map_err(io_err)?;
    file.write_all(serialized.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(())
}

/// Parse existing database content into its entries.
///
/// An empty or whitespace-only file is an empty database, not a parse
/// error. Entries are kept as raw JSON values so prior content is never
/// re-validated or reshaped.
fn parse_database(content: &str, path: &Path) -> Result<Vec<Value>, RecorderError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Value =
        serde_json::from_str(content).map_err(|e| RecorderError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;
    match parsed {
        Value::Array(entries) => Ok(entries),
        _ => Err(RecorderError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}

/// Replace the entry with the record's `file` key, or append a new one.
///
/// A replaced entry keeps its position so unrelated entries stay in
/// first-appearance order and rebuilds produce stable databases.
fn upsert(entries: &mut Vec<Value>, record: &CompileRecord) -> Result<(), RecorderError> {
    let new_entry = serde_json::to_value(record).map_err(RecorderError::Serialize)?;
    for entry in entries.iter_mut() {
        if entry.get("file").and_then(Value::as_str) == Some(record.file.as_str()) {
            debug!("replacing entry for {}", record.file);
            *entry = new_entry;
            return Ok(());
        }
    }
    debug!("appending entry for {}", record.file);
    entries.push(new_entry);
    Ok(())
}
