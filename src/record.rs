//! Record construction for a single compiler invocation.
//!
//! One record corresponds to one compiled source file and carries exactly the
//! four keys the compilation-database format defines: `directory`, `file`,
//! `output`, and `arguments`.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One entry in `compile_commands.json`.
///
/// Field names and types match the de facto compilation-database format
/// consumed by clangd and similar tooling, so they must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRecord {
    /// Absolute path of the build root.
    pub directory: String,
    /// Source file exactly as given on the command line; the merge key.
    pub file: String,
    /// Path following the first `-o` flag, or empty if none was given.
    pub output: String,
    /// Resolved compiler path followed by the compiler's tokens, verbatim.
    pub arguments: Vec<String>,
}

impl CompileRecord {
    /// Build the record for one invocation.
    ///
    /// `compiler_args` holds the tokens that followed the source file on the
    /// command line. The source-file token itself doubles as the compiler's
    /// first argument, so it leads the recorded vector and takes part in the
    /// `-o` scan.
    pub fn new(
        directory: &Path,
        compiler: &str,
        source_file: &str,
        compiler_args: &[String],
    ) -> Self {
        let mut arguments = Vec::with_capacity(compiler_args.len() + 2);
        arguments.push(resolve_compiler(compiler));
        arguments.push(source_file.to_string());
        arguments.extend(compiler_args.iter().cloned());

        CompileRecord {
            directory: directory.display().to_string(),
            file: source_file.to_string(),
            output: output_path(&arguments[1..]),
            arguments,
        }
    }
}

/// Resolve a compiler name to an absolute executable path via `$PATH`.
///
/// Resolution failure is not fatal: the record keeps the name as given, so
/// the database still reflects what the build actually ran.
fn resolve_compiler(name: &str) -> String {
    match which::which(name) {
        Ok(path) => path.display().to_string(),
        Err(e) => {
            debug!("could not resolve compiler '{}': {}", name, e);
            name.to_string()
        }
    }
}

/// Extract the declared output path from a compiler token list.
///
/// The token after the first exact `-o` wins. No `-o`, or `-o` as the final
/// token, yields an empty string.
pub fn output_path(args: &[String]) -> String {
    let mut tokens = args.iter();
    while let Some(token) = tokens.next() {
        if token == "-o" {
            return tokens.next().cloned().unwrap_or_default();
        }
    }
    String::new()
}

/// Canonicalized directory containing the running executable.
///
/// The build system drops this tool into the build root, so every record
/// gets that directory regardless of the caller's working directory.
pub fn build_root() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?.canonicalize()?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(io::Error::new(
            io::ErrorKind::NotFound,
            "executable has no parent directory",
        )),
    }
}
