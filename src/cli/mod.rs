//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;
pub mod source;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// noteport - export notes from a note service to portable HTML
#[derive(Parser, Debug)]
#[command(name = "noteport", version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to ~/.config/noteport/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the notes an export would include, oldest first
    #[command(name = "ls")]
    List(ListArgs),

    /// Export notes to HTML with their attachments
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where notes are read from.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Read notes from a JSON snapshot instead of the service
    #[arg(long, conflicts_with = "endpoint")]
    pub snapshot: Option<PathBuf>,

    /// Base URL of the note service API
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Authentication token for the note service
    #[arg(long, env = "NOTEPORT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum number of notes to list
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `export` command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory to export into (one subdirectory per note)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of notes to export
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Custom template file
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// CSS theme (default, dark, or path to CSS file)
    #[arg(long)]
    pub theme: Option<String>,

    /// Skip notes that fail and continue with the rest
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// CLI output format (for status messages, not export content)
    #[arg(long = "cli-format", value_enum, default_value_t = OutputFormat::Human)]
    pub cli_format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
