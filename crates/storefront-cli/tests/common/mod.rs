//! Helpers for running the CLI binary against a mock API.
#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;
use wiremock::MockServer;

/// An isolated HOME/XDG_DATA_HOME plus the API URL to point the CLI at.
pub struct Sandbox {
    home: TempDir,
    api_url: String,
}

impl Sandbox {
    pub fn new(server: &MockServer) -> Self {
        Self {
            home: tempfile::tempdir().expect("Failed to create temp dir"),
            api_url: server.uri(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn session_path(&self) -> PathBuf {
        self.home
            .path()
            .join("data")
            .join("storefront")
            .join("session.json")
    }

    /// Run the CLI with arguments. The process runs on a blocking thread so
    /// the mock server keeps serving.
    pub async fn run(&self, args: &[&str]) -> Output {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let home = self.home.path().to_path_buf();
        let api_url = self.api_url.clone();

        tokio::task::spawn_blocking(move || {
            Command::new(env!("CARGO_BIN_EXE_storefront"))
                .args(&args)
                .env("HOME", &home)
                .env("XDG_DATA_HOME", home.join("data"))
                .env("STOREFRONT_API_URL", api_url)
                .env_remove("RUST_LOG")
                .output()
                .expect("Failed to execute CLI")
        })
        .await
        .expect("CLI thread panicked")
    }

    /// Run the CLI and expect success. Returns stdout.
    pub async fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure. Returns stderr.
    pub async fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Seed the stored session.
    pub fn write_session(&self, session: serde_json::Value) {
        let path = self.session_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string_pretty(&session).unwrap()).unwrap();
    }

    pub fn read_session(&self) -> serde_json::Value {
        let json = std::fs::read_to_string(self.session_path()).expect("No session file");
        serde_json::from_str(&json).unwrap()
    }
}
