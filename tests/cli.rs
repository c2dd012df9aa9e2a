//! End-to-end tests driving the compdb-record binary.
//!
//! These exercise the whole pipeline the build system sees: argument
//! parsing, compiler resolution, and the locked database merge, checked
//! through exit codes and the resulting compile_commands.json.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const DB_FILE_NAME: &str = "compile_commands.json";

fn run(db_dir: &Path, compiler: &str, source: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compdb-record"))
        .arg(db_dir)
        .arg(compiler)
        .arg(source)
        .args(args)
        .output()
        .expect("failed to spawn compdb-record")
}

fn read_db(dir: &Path) -> Vec<Value> {
    let content = fs::read_to_string(dir.join(DB_FILE_NAME)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_records_one_invocation() {
    let temp = tempdir().unwrap();
    let output = run(temp.path(), "cc", "foo.c", &["-c", "-O2", "-o", "foo.o"]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let entries = read_db(temp.path());
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry["file"], "foo.c");
    assert_eq!(entry["output"], "foo.o");

    // directory is the build root the binary runs from, always absolute
    let directory = entry["directory"].as_str().unwrap();
    assert!(Path::new(directory).is_absolute());

    // arguments: compiler token first, then the source file, then the flags
    let arguments = entry["arguments"].as_array().unwrap();
    assert_eq!(arguments.len(), 6);
    assert_eq!(arguments[1], "foo.c");
    assert_eq!(arguments[2], "-c");
    assert_eq!(arguments[5], "foo.o");
}

#[test]
fn test_hyphen_flags_pass_through_verbatim() {
    let temp = tempdir().unwrap();
    let output = run(
        temp.path(),
        "cc",
        "foo.c",
        &["-c", "-Wall", "-Werror", "--std=c17", "-o", "foo.o"],
    );
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let entries = read_db(temp.path());
    let arguments = entries[0]["arguments"].as_array().unwrap();
    assert!(arguments.iter().any(|a| a == "--std=c17"));
    assert!(arguments.iter().any(|a| a == "-Werror"));
}

#[test]
fn test_no_output_flag_records_empty_output() {
    let temp = tempdir().unwrap();
    let output = run(temp.path(), "cc", "foo.c", &["-E"]);
    assert!(output.status.success());

    let entries = read_db(temp.path());
    assert_eq!(entries[0]["output"], "");
}

#[test]
fn test_second_invocation_replaces_first() {
    let temp = tempdir().unwrap();
    run(temp.path(), "cc", "foo.c", &["-O0", "-o", "debug.o"]);
    let output = run(temp.path(), "cc", "foo.c", &["-O3", "-o", "release.o"]);
    assert!(output.status.success());

    let entries = read_db(temp.path());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["output"], "release.o");
}

#[test]
fn test_distinct_sources_accumulate() {
    let temp = tempdir().unwrap();
    for source in ["a.c", "b.c", "c.c"] {
        let output = run(temp.path(), "cc", source, &["-c"]);
        assert!(output.status.success());
    }

    let files: Vec<_> = read_db(temp.path())
        .iter()
        .map(|e| e["file"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(files, ["a.c", "b.c", "c.c"]);
}

#[test]
fn test_malformed_database_is_a_fatal_diagnostic() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(DB_FILE_NAME);
    fs::write(&path, "not json").unwrap();

    let output = run(temp.path(), "cc", "foo.c", &["-c"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not valid JSON"), "stderr: {}", stderr);

    // The corrupt file must be left exactly as found
    assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
}

#[test]
fn test_missing_database_directory_is_fatal() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("no-such-dir");
    let output = run(&missing, "cc", "foo.c", &["-c"]);
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn test_empty_preexisting_database_succeeds() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(DB_FILE_NAME), "").unwrap();

    let output = run(temp.path(), "cc", "foo.c", &["-c"]);
    assert!(output.status.success());
    assert_eq!(read_db(temp.path()).len(), 1);
}
