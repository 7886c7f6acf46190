//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::export::{DEFAULT_BATCH_LIMIT, FailurePolicy};
use crate::infra::MimeTable;

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default export directory
    pub output: Option<PathBuf>,

    /// Note service base URL
    pub endpoint: Option<String>,

    /// Note service authentication token
    pub token: Option<String>,

    /// Snapshot file to read instead of the service
    pub snapshot: Option<PathBuf>,

    /// Number of notes per export
    pub limit: Option<usize>,

    /// CSS theme name or path
    pub theme: Option<String>,

    /// Custom template file
    pub template: Option<PathBuf>,

    /// Continue past notes that fail to export
    #[serde(default)]
    pub keep_going: bool,

    /// Extra MIME type to extension mappings, e.g. `"audio/x-m4a" = ".m4a"`
    #[serde(default)]
    pub mime: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/noteport/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("noteport")
            .join("config.toml")
    }

    /// Resolve the export directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--output` argument
    /// 2. Config file `output` setting
    /// 3. `./export`
    pub fn output_dir(&self, cli_output: Option<&PathBuf>) -> PathBuf {
        cli_output
            .cloned()
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from("export"))
    }

    /// Resolve the batch size, with CLI argument taking precedence.
    pub fn limit(&self, cli_limit: Option<usize>) -> usize {
        cli_limit.or(self.limit).unwrap_or(DEFAULT_BATCH_LIMIT)
    }

    /// Resolve the theme, with CLI argument taking precedence.
    pub fn theme(&self, cli_theme: Option<&str>) -> Option<String> {
        cli_theme.map(String::from).or_else(|| self.theme.clone())
    }

    /// Resolve the template path, with CLI argument taking precedence.
    pub fn template(&self, cli_template: Option<&PathBuf>) -> Option<PathBuf> {
        cli_template.cloned().or_else(|| self.template.clone())
    }

    /// Failure policy: `--keep-going` or `keep_going = true` isolates failures.
    pub fn failure_policy(&self, cli_keep_going: bool) -> FailurePolicy {
        if cli_keep_going || self.keep_going {
            FailurePolicy::Isolate
        } else {
            FailurePolicy::FailFast
        }
    }

    /// Built-in MIME table with the `[mime]` overrides applied.
    pub fn mime_table(&self) -> Result<MimeTable> {
        MimeTable::new()
            .with_overrides(self.mime.iter().map(|(m, e)| (m.as_str(), e.as_str())))
            .context("invalid [mime] entry in config")
    }
}
