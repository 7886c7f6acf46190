//! Choosing the note store a command reads from.

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::cli::SourceArgs;
use crate::cli::config::Config;
use crate::service::{DEFAULT_TIMEOUT, HttpNoteStore, NoteStore, SnapshotStore};

/// Opens the note store named by the CLI flags, falling back to the config.
///
/// A snapshot wins over an endpoint at the same level, and CLI flags win
/// over the config file.
pub fn open_store(args: &SourceArgs, config: &Config) -> Result<Box<dyn NoteStore>> {
    if let Some(path) = &args.snapshot {
        return open_snapshot(path);
    }
    if let Some(endpoint) = &args.endpoint {
        return open_http(endpoint, args.token.as_ref().or(config.token.as_ref()));
    }
    if let Some(path) = &config.snapshot {
        return open_snapshot(path);
    }
    if let Some(endpoint) = &config.endpoint {
        return open_http(endpoint, args.token.as_ref().or(config.token.as_ref()));
    }
    bail!("no note source configured: pass --snapshot FILE or --endpoint URL")
}

fn open_snapshot(path: &std::path::Path) -> Result<Box<dyn NoteStore>> {
    debug!(path = %path.display(), "reading notes from snapshot");
    let store = SnapshotStore::open(path)?;
    Ok(Box::new(store))
}

fn open_http(endpoint: &str, token: Option<&String>) -> Result<Box<dyn NoteStore>> {
    let Some(token) = token else {
        bail!("no token for {}: pass --token or set NOTEPORT_TOKEN", endpoint);
    };
    debug!(endpoint, "reading notes from service");
    let store = HttpNoteStore::new(endpoint, token.as_str(), DEFAULT_TIMEOUT)
        .with_context(|| format!("cannot connect to {}", endpoint))?;
    Ok(Box::new(store))
}
