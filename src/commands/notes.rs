//! `static-notes notes` - compiled notes overlaid with pending ones

use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;
use static_notes_core::artifacts::ArtifactWriter;
use static_notes_core::config::Config;
use static_notes_core::error::Result;
use static_notes_core::pending::PendingNotes;

/// Execute the notes command
pub fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let writer = ArtifactWriter::new(&config.output_dir);
    let pending_path = config.pending_path();
    let mut pending = PendingNotes::load(&pending_path);

    if let Some(manifest) = writer.load_manifest() {
        if !pending.reconcile(&manifest).is_empty() {
            pending.save(&pending_path)?;
        }
    }

    let merged = pending.merge_with_static(writer.load_all()?);

    match cli.format {
        OutputFormat::Json => {
            let notes: Vec<_> = merged
                .iter()
                .map(|note| {
                    json!({
                        "filename": note.filename,
                        "title": note.title,
                        "tags": note.tags,
                        "createdDate": note.created_date,
                        "sha": note.sha,
                        "pending": pending.get(&note.filename).is_some(),
                    })
                })
                .collect();
            print_json(&json!(notes))?;
        }
        OutputFormat::Human => {
            if merged.is_empty() {
                if !cli.quiet {
                    println!("No compiled notes yet (run `static-notes build`)");
                }
                return Ok(());
            }
            for note in &merged {
                let marker = if pending.get(&note.filename).is_some() {
                    " (pending)"
                } else {
                    ""
                };
                println!("{}  {}{}", note.filename, note.title, marker);
            }
        }
    }

    Ok(())
}
