//! Common test utilities shared across integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Get the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // Go up from crates/beads to the workspace root.
    manifest_dir
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Build the binary once and return its path.
pub fn get_beads_binary() -> PathBuf {
    let workspace = workspace_root();

    let status = Command::new("cargo")
        .args(["build", "--package", "beads", "--quiet"])
        .current_dir(&workspace)
        .status()
        .expect("Failed to build beads");

    assert!(status.success(), "Failed to build beads binary");

    workspace.join("target/debug/beads")
}

/// Run the beads binary in the specified directory.
pub fn run_beads_in_dir(dir: &Path, args: &[&str]) -> Output {
    let binary = get_beads_binary();

    Command::new(&binary)
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("BEADS_ACTOR", "test")
        .output()
        .expect("Failed to execute beads binary")
}

/// Run beads and assert it succeeded, returning stdout.
pub fn run_beads_ok(dir: &Path, args: &[&str]) -> String {
    let output = run_beads_in_dir(dir, args);
    assert!(
        output.status.success(),
        "beads {args:?} failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}
