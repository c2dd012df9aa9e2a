//! Compilation-database recorder CLI.
//!
//! Invoked by the build system once per compiled source file:
//!
//! ```text
//! compdb-record <db-directory> <compiler-name> <source-file> [compiler-args...]
//! ```
//!
//! Exit code 0 means the record was merged; any failure prints a diagnostic
//! on stderr and exits non-zero so the build driver fails the step.

use clap::Parser as ClapParser;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "compdb-record")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Record a compiler invocation into compile_commands.json",
    long_about = None
)]
struct Cli {
    /// Directory in which compile_commands.json is read and written
    db_directory: PathBuf,

    /// Compiler name, resolved to an absolute path via $PATH
    compiler: String,

    /// Source file being compiled (the database merge key)
    source_file: String,

    /// Remaining compiler arguments, recorded verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    compiler_args: Vec<String>,
}

fn main() {
    // Quiet by default; RUST_LOG=compdb_record=debug shows merge decisions
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = compdb_record::record_invocation(
        &cli.db_directory,
        &cli.compiler,
        &cli.source_file,
        &cli.compiler_args,
    ) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
