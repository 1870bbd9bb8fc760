//! `static-notes list` - show notes in the configured source

use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;
use static_notes_core::config::Config;
use static_notes_core::error::Result;
use static_notes_core::source;

/// Execute the list command
pub fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let source = source::open(config)?;
    let records = source.list_notes()?;

    match cli.format {
        OutputFormat::Json => {
            let notes: Vec<_> = records
                .iter()
                .map(|r| {
                    json!({
                        "name": r.name,
                        "path": r.path,
                        "content_hash": r.content_hash,
                        "size_bytes": r.size_bytes,
                    })
                })
                .collect();
            print_json(&json!(notes))?;
        }
        OutputFormat::Human => {
            if records.is_empty() {
                if !cli.quiet {
                    println!("No notes found in {}", source.describe());
                }
                return Ok(());
            }
            for record in &records {
                let hash: String = record.content_hash.chars().take(12).collect();
                println!("{}  {}  {} bytes", record.name, hash, record.size_bytes);
            }
        }
    }

    Ok(())
}
