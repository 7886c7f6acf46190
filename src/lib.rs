//! noteport - export notes from a note service to portable HTML

pub mod cli;
pub mod domain;
pub mod export;
pub mod infra;
pub mod logging;
pub mod service;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_completions, handle_export, handle_list},
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &cli.command {
        Command::List(args) => handle_list(args, &config),
        Command::Export(args) => handle_export(args, &config),
        Command::Completions(args) => handle_completions(args),
    }
}
