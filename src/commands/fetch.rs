//! `static-notes fetch` - read served artifacts through the static reader

use std::sync::Arc;

use serde_json::json;

use crate::cli::commands::FetchArgs;
use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;
use static_notes_core::bail_usage;
use static_notes_core::config::Config;
use static_notes_core::error::{NotesError, Result};
use static_notes_core::http::{HttpClient, UreqClient};
use static_notes_core::log_cache_metrics;
use static_notes_core::reader::{resolve_base_url, RuntimeEnv, StaticContentReader};

/// Execute the fetch command
pub fn execute(cli: &Cli, config: &Config, args: &FetchArgs) -> Result<()> {
    let base_url = match (&args.base_url, args.dev_port) {
        (Some(url), _) => url.clone(),
        (None, Some(port)) => resolve_base_url(&RuntimeEnv::development(port)),
        (None, None) => bail_usage!("fetch needs --base-url or --dev-port"),
    };

    let http: Arc<dyn HttpClient> = Arc::new(UreqClient::new(config.http_timeout_seconds));
    let reader = StaticContentReader::new(http, base_url);

    if args.filenames.is_empty() {
        let manifest = reader
            .index()
            .ok_or_else(|| NotesError::not_found("manifest", reader.base_url()))?;
        match cli.format {
            OutputFormat::Json => print_json(&serde_json::to_value(&manifest)?)?,
            OutputFormat::Human => {
                println!(
                    "{} public notes of {} (compiled {})",
                    manifest.public_notes, manifest.total_notes, manifest.compiled_at
                );
                for (filename, summary) in manifest.notes.iter().rev() {
                    println!("{}  {}", filename, summary.title);
                }
            }
        }
        return Ok(());
    }

    let found = reader.batch(&args.filenames);
    log_cache_metrics!(reader.metrics(), "fetch");
    let missing: Vec<&String> = args
        .filenames
        .iter()
        .filter(|name| !found.contains_key(name.as_str()))
        .collect();

    if found.is_empty() {
        return Err(NotesError::not_found("note", args.filenames.join(", ")));
    }

    match cli.format {
        OutputFormat::Json => print_json(&json!({
            "notes": found,
            "missing": missing,
        }))?,
        OutputFormat::Human => {
            for name in &args.filenames {
                if let Some(note) = found.get(name) {
                    println!("# {} ({})", note.title, note.filename);
                    println!();
                    println!("{}", note.content);
                    println!();
                }
            }
            for name in &missing {
                eprintln!("warning: {} is not available", name);
            }
        }
    }

    Ok(())
}
