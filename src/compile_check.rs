//! The end-to-end acceptance check: does `javac` actually accept what the
//! emitter produced?
//!
//! This is deliberately not consumed by [`crate::model`], [`crate::miner`],
//! [`crate::solver`], or [`crate::emit`] — spec.md §4.4 treats it as a
//! validator for external callers, not a component the core depends on.
//! Grounded on the same `Command`-driven `javac` invocation the teacher's
//! own build script uses to compile its test fixtures.

use std::path::{Path, PathBuf};
use std::process::Command;

/// The outcome of attempting to compile a generated `Main.java`.
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// `true` iff `javac` exited with status 0 and produced no output on
    /// stderr (spec.md §4.4).
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Failure to even invoke the check (as opposed to `javac` rejecting the
/// source, which is a non-error [`CompileReport`] with `success: false`).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Could not create the scratch directory, write `Main.java`, or spawn
    /// `javac`.
    #[error("I/O error while preparing or running javac: {0}")]
    Io(#[from] std::io::Error),
    /// One of the supplied jar paths contains the platform path-list
    /// separator and cannot be joined into a classpath.
    #[error("invalid jar path for classpath: {0}")]
    InvalidClasspath(#[from] std::env::JoinPathsError),
}

/// Writes `source` to a temporary `Main.java`, invokes
/// `javac -cp <jars> Main.java`, and reports the result.
///
/// # Errors
/// Returns [`Error`] if the harness itself could not run (no scratch
/// directory, `javac` not found, bad jar paths) — never for `javac`
/// rejecting the source, which is reported as `Ok(CompileReport { success: false, .. })`.
pub fn check(source: &str, jars: &[PathBuf]) -> Result<CompileReport, Error> {
    let scratch = tempfile::tempdir()?;
    let main_java = scratch.path().join("Main.java");
    std::fs::write(&main_java, source)?;

    let mut javac = Command::new("javac");
    if !jars.is_empty() {
        let classpath = std::env::join_paths(jars)?;
        javac.arg("-cp").arg(classpath);
    }
    javac.arg(&main_java);

    let output = javac.output()?;
    Ok(CompileReport {
        success: output.status.success() && output.stderr.is_empty(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Whether a `javac` executable can be located on `PATH` at all. Callers
/// (and this crate's own integration tests) use this to skip the check
/// gracefully in environments without a JDK rather than fail outright.
#[must_use]
pub fn javac_available() -> bool {
    Command::new("javac").arg("-version").output().is_ok_and(|o| o.status.success())
}

/// Convenience wrapper for checking a set of directories of already-loaded
/// `.class` files rather than `.jar` archives, used by the `construct`
/// binary's `--classpath` flag.
#[must_use]
pub fn classpath_from_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    dirs.into_iter().filter(|d| Path::new(d).is_dir()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_trivial_emitted_program() {
        if !javac_available() {
            eprintln!("skipping: no javac on PATH");
            return;
        }
        let source = "package org.example;\n\npublic final class Main {\n    public static void main(String[] args) {\n        int int_var = 0;\n    }\n}\n";
        let report = check(source, &[]).expect("harness itself should run");
        assert!(report.success, "stderr: {}", report.stderr);
    }

    #[test]
    fn reports_failure_for_invalid_source() {
        if !javac_available() {
            eprintln!("skipping: no javac on PATH");
            return;
        }
        let source = "this is not java";
        let report = check(source, &[]).expect("harness itself should run");
        assert!(!report.success);
    }
}
