//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::NoteSummary;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// Plain identities or file paths, one per line
    Paths,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub guid: String,
    pub title: String,
    pub created: String,
}

impl From<&NoteSummary> for NoteListing {
    fn from(summary: &NoteSummary) -> Self {
        Self {
            guid: summary.guid.to_string(),
            title: summary.title.clone(),
            created: summary.created.to_rfc3339(),
        }
    }
}
