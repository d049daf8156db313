//! Shared helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

/// A command isolated from the user's configuration and report directories.
///
/// The returned `TempDir` stands in for the platform config and data
/// directories and must outlive the command.
pub fn cli() -> (Command, TempDir) {
    let home = TempDir::new().expect("create temp dir");
    let mut cmd = cargo_bin_cmd!("opsimnav-cli");
    cmd.env_remove("OPSIMNAV_CONFIG")
        .env_remove("OPSIMNAV_REPORT_DIR")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "error");
    (cmd, home)
}

/// Scenario arguments for the KCS example: 3 m waves, 15 kn wind, 75% load, level trim.
#[allow(dead_code)]
pub const KCS_EXAMPLE: [&str; 10] = [
    "--class", "KCS", "--wave", "3", "--wind", "15", "--load", "75", "--trim", "0",
];
