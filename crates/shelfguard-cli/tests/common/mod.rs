use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary with an isolated session directory.
pub fn run_cli(args: &[&str], session_dir: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shelfguard"));
    cmd.args(args);
    cmd.arg("--session-dir").arg(session_dir);
    cmd.env_remove("SHELFGUARD_API");
    cmd.env_remove("SHELFGUARD_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(args: &[&str], session_dir: &Path) -> String {
    let output = run_cli(args, session_dir);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stdout and stderr.
pub fn run_cli_failure(args: &[&str], session_dir: &Path) -> (String, String) {
    let output = run_cli(args, session_dir);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Write a persisted session the way the file storage lays it out.
pub fn seed_session(session_dir: &Path, json: &str) {
    std::fs::create_dir_all(session_dir).unwrap();
    std::fs::write(session_dir.join("session.json"), json).unwrap();
}
