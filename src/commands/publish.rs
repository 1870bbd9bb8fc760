//! `static-notes publish` and `unpublish` - the admin write path

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::cli::commands::{PublishArgs, UnpublishArgs};
use crate::cli::{Cli, OutputFormat};
use crate::commands::{build, print_json};
use static_notes_core::auth::AdminAuth;
use static_notes_core::bail_usage;
use static_notes_core::config::Config;
use static_notes_core::error::{NotesError, Result};
use static_notes_core::http::{HttpClient, UreqClient};
use static_notes_core::pending::PendingNotes;
use static_notes_core::publish::{note_filename, Publisher};
use static_notes_core::source::GithubClient;

fn github_client(config: &Config) -> Result<GithubClient> {
    let http: Arc<dyn HttpClient> = Arc::new(UreqClient::new(config.http_timeout_seconds));
    Ok(GithubClient::new(config.github()?, http))
}

/// Rebuild and record the outcome in the pending counters
fn rebuild(config: &Config, pending: &mut PendingNotes) -> Result<bool> {
    let path = config.pending_path();
    pending.mark_building();
    pending.save(&path)?;

    let result = build::run_build(config);
    // run_build may have reconciled the file on disk
    *pending = PendingNotes::load(&path);
    match result {
        Ok(_) => pending.mark_completed(),
        Err(ref e) => {
            warn!(error = %e, "Rebuild after publish failed");
            pending.mark_failed();
        }
    }
    pending.save(&path)?;
    Ok(result.is_ok())
}

pub fn publish(cli: &Cli, config: &Config, auth: &AdminAuth, args: &PublishArgs) -> Result<()> {
    auth.require()?;

    let file = args.file.as_path();
    let Some(local_name) = file.file_name().map(|n| n.to_string_lossy().to_string()) else {
        bail_usage!(format!("not a file: {}", file.display()));
    };
    let content = fs::read_to_string(file)
        .map_err(|e| NotesError::fetch(file.display(), e))?;

    let client = github_client(config)?;
    let publisher = Publisher::new(&client);
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| publisher.default_path(&local_name));
    let published = publisher.publish(&path, &content, args.message.as_deref())?;

    let pending_path = config.pending_path();
    let mut pending = PendingNotes::load(&pending_path);
    match &published.pending {
        Some(note) => pending.upsert(note.clone()),
        None => {
            pending.remove(&published.filename);
        }
    }
    pending.save(&pending_path)?;

    let rebuilt = if args.rebuild {
        Some(rebuild(config, &mut pending)?)
    } else {
        None
    };

    match cli.format {
        OutputFormat::Json => print_json(&json!({
            "path": published.path,
            "filename": published.filename,
            "created": published.created,
            "commit": published.commit,
            "pending": published.pending.is_some(),
            "rebuilt": rebuilt,
        }))?,
        OutputFormat::Human => {
            if !cli.quiet {
                let verb = if published.created { "Created" } else { "Updated" };
                println!("{} {} ({})", verb, published.path, published.commit);
                match rebuilt {
                    Some(true) => println!("Rebuilt static notes"),
                    Some(false) => println!("Rebuild failed; the note stays pending"),
                    None => {}
                }
            }
        }
    }

    Ok(())
}

pub fn unpublish(
    cli: &Cli,
    config: &Config,
    auth: &AdminAuth,
    args: &UnpublishArgs,
) -> Result<()> {
    auth.require()?;

    let filename = note_filename(&args.path)?;
    let client = github_client(config)?;
    let commit = Publisher::new(&client).unpublish(&args.path, args.message.as_deref())?;

    let pending_path = config.pending_path();
    let mut pending = PendingNotes::load(&pending_path);
    if pending.remove(&filename).is_some() {
        pending.save(&pending_path)?;
    }

    match cli.format {
        OutputFormat::Json => print_json(&json!({
            "path": args.path,
            "commit": commit,
        }))?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Deleted {} ({})", args.path, commit);
            }
        }
    }

    Ok(())
}
