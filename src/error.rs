//! Error types for database recording.
//!
//! Every failure is fatal to the invocation: the calling build system treats
//! a non-zero exit as a failed build step, so no variant carries recovery
//! hints, only enough context to diagnose the environment.

use std::io;
use std::path::PathBuf;

/// Error type for one recording invocation.
///
/// This allows proper error propagation using `?` for both environment
/// errors (file open, lock, read, write) and data errors (malformed
/// pre-existing database content).
#[derive(Debug)]
pub enum RecorderError {
    /// The directory holding this executable could not be resolved.
    BuildRoot(io::Error),
    /// The database file could not be opened or created.
    Open { path: PathBuf, source: io::Error },
    /// The exclusive advisory lock could not be acquired.
    Lock { path: PathBuf, source: io::Error },
    /// Reading or rewriting the database failed while the lock was held.
    Io { path: PathBuf, source: io::Error },
    /// The existing database content is not valid JSON.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The existing database parsed as JSON but is not an array.
    NotAnArray { path: PathBuf },
    /// A record could not be serialized to JSON.
    Serialize(serde_json::Error),
}

impl std::fmt::Display for RecorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecorderError::BuildRoot(e) => {
                write!(f, "could not determine the build root: {}", e)
            }
            RecorderError::Open { path, source } => {
                write!(f, "could not open {}: {}", path.display(), source)
            }
            RecorderError::Lock { path, source } => {
                write!(f, "could not lock {}: {}", path.display(), source)
            }
            RecorderError::Io { path, source } => {
                write!(f, "could not update {}: {}", path.display(), source)
            }
            RecorderError::Malformed { path, source } => {
                write!(f, "{} is not valid JSON: {}", path.display(), source)
            }
            RecorderError::NotAnArray { path } => {
                write!(f, "{} is not a JSON array", path.display())
            }
            RecorderError::Serialize(e) => {
                write!(f, "could not serialize record: {}", e)
            }
        }
    }
}

impl std::error::Error for RecorderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecorderError::BuildRoot(e) => Some(e),
            RecorderError::Open { source, .. } => Some(source),
            RecorderError::Lock { source, .. } => Some(source),
            RecorderError::Io { source, .. } => Some(source),
            RecorderError::Malformed { source, .. } => Some(source),
            RecorderError::NotAnArray { .. } => None,
            RecorderError::Serialize(e) => Some(e),
        }
    }
}
