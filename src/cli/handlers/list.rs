//! List command handler.

use anyhow::Result;

use super::truncate_str;
use crate::cli::ListArgs;
use crate::cli::config::Config;
use crate::cli::output::{NoteListing, Output, OutputFormat};
use crate::cli::source::open_store;
use crate::export::fetch_batch;

pub fn handle_list(args: &ListArgs, config: &Config) -> Result<()> {
    let store = open_store(&args.source, config)?;
    let notes = fetch_batch(store.as_ref(), config.limit(args.limit))?;

    match args.format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes found.");
            } else {
                println!("{:<20}  {:<50}  {:>10}", "GUID", "Title", "Created");
                println!(
                    "{:<20}  {:<50}  {:>10}",
                    "--------------------",
                    "--------------------------------------------------",
                    "----------"
                );

                for note in &notes {
                    let guid = truncate_str(note.guid.as_str(), 20);
                    let title = truncate_str(&note.title, 50);
                    let created = note.created.format("%Y-%m-%d").to_string();
                    println!("{:<20}  {:<50}  {:>10}", guid, title, created);
                }

                println!();
                println!("{} note(s)", notes.len());
            }
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(NoteListing::from).collect();
            let output = Output::new(listings);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Paths => {
            for note in &notes {
                println!("{}", note.guid);
            }
        }
    }

    Ok(())
}
