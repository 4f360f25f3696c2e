use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary against an isolated data directory and API.
pub fn run_cli_with_env(args: &[&str], data_dir: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_authkeep"));
    cmd.args(args);
    cmd.env("AUTHKEEP_DATA_DIR", data_dir);
    cmd.env("AUTHKEEP_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_with_env_success(args: &[&str], data_dir: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, data_dir, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_with_env_failure(args: &[&str], data_dir: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, data_dir, api_url);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Read `status --json` as a JSON value.
pub fn status_json(data_dir: &Path, api_url: &str) -> serde_json::Value {
    let stdout = run_cli_with_env_success(&["status", "--json"], data_dir, api_url);
    serde_json::from_str(&stdout).expect("status --json should print JSON")
}
