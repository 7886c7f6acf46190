//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test binaries
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Fluent wrapper around `assert_cmd::Command` for the `noteport` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct NoteportCommand {
    args: Vec<String>,
}

impl NoteportCommand {
    /// Creates a new command for the `noteport` binary.
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Sets the `--config` option.
    pub fn config(mut self, path: &Path) -> Self {
        self.args.push("--config".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Sets the `--snapshot` option.
    pub fn snapshot(mut self, path: &Path) -> Self {
        self.args.push("--snapshot".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Sets the `--output` option.
    pub fn output(mut self, path: &Path) -> Self {
        self.args.push("--output".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("noteport").expect("Failed to find noteport binary");
        cmd.env_remove("NOTEPORT_TOKEN").env_remove("RUST_LOG");
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--format paths` to the command.
    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }

    /// Adds `--cli-format json` to the command.
    pub fn cli_format_json(self) -> Self {
        self.args(["--cli-format", "json"])
    }
}

impl Default for NoteportCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_runs_binary() {
        NoteportCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_output_success() {
        let output = NoteportCommand::new().args(["--help"]).output_success();
        assert!(output.contains("noteport"));
    }

    #[test]
    fn test_command_builds_args_in_order() {
        let cmd = NoteportCommand::new()
            .args(["export"])
            .snapshot(Path::new("s.json"))
            .cli_format_json();
        assert_eq!(
            cmd.get_args(),
            ["export", "--snapshot", "s.json", "--cli-format", "json"]
        );
    }
}
