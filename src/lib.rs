//! Compilation-database recorder library.
//!
//! Records one compiler invocation into a shared `compile_commands.json`.
//! A parallel build driver runs one recorder instance per compiled source
//! file; each instance merges its record into the database under an
//! exclusive advisory file lock, so concurrent updates serialize and none
//! are lost.
//!
//! The database is the de facto standard JSON array consumed by clangd and
//! other source-analysis tooling: one object per source file with
//! `directory`, `file`, `output`, and `arguments` keys.

pub mod error;
pub mod record;
pub mod store;

pub use error::RecorderError;
pub use record::{CompileRecord, build_root, output_path};
pub use store::{DB_FILE_NAME, merge_record};

use std::path::Path;

/// Record one compiler invocation into `<db_dir>/compile_commands.json`.
///
/// `compiler_args` holds the tokens that followed the source file on the
/// command line; the record's argument vector is the resolved compiler path,
/// the source file, then those tokens verbatim.
pub fn record_invocation(
    db_dir: &Path,
    compiler: &str,
    source_file: &str,
    compiler_args: &[String],
) -> Result<(), RecorderError> {
    let root = record::build_root().map_err(RecorderError::BuildRoot)?;
    let record = CompileRecord::new(&root, compiler, source_file, compiler_args);
    store::merge_record(db_dir, &record)
}
