#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const EMAIL: &str = "alice@example.com";

/// A throwaway data directory for one test.
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(key)
    }

    pub fn read_record(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.record_path(key)).ok()
    }

    pub fn write_record(&self, key: &str, contents: &str) -> std::io::Result<()> {
        fs::write(self.record_path(key), contents)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join("taskflow.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// `tf` pointed at this directory with no credentials.
    pub fn anonymous_cmd(&self) -> Command {
        let mut cmd = tf_cmd();
        cmd.env("TF_DATA_DIR", self.path());
        cmd
    }

    /// `tf` pointed at this directory, signed in as the default user.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.anonymous_cmd();
        cmd.env("TF_USERNAME", USERNAME).env("TF_PASSWORD", PASSWORD);
        cmd
    }

    /// Register the default user.
    pub fn register(&self) {
        self.cmd()
            .args(["register", "--email", EMAIL])
            .assert()
            .success();
    }

    /// Run a signed-in command with `--json` and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("run tf");
        assert!(
            output.status.success(),
            "tf {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        let envelope: Value = serde_json::from_slice(&output.stdout).expect("json envelope");
        envelope["data"].clone()
    }
}

pub fn tf_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tf").expect("binary");
    cmd.env_remove("TF_DATA_DIR")
        .env_remove("TF_CONFIG")
        .env_remove("TF_USERNAME")
        .env_remove("TF_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}
