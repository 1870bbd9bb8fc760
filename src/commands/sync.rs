//! `static-notes sync` - mirror the build output into the public directory

use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;
use static_notes_core::config::Config;
use static_notes_core::error::Result;
use static_notes_core::sync::{MirrorSync, SyncOutcome};

/// Execute the sync command
pub fn execute(cli: &Cli, config: &Config, dry_run: bool) -> Result<()> {
    let mirror = MirrorSync::new(&config.output_dir, &config.public_dir);

    if dry_run {
        let plan = mirror.plan()?;
        match cli.format {
            OutputFormat::Json => print_json(&json!({
                "dry_run": true,
                "source": mirror.source().display().to_string(),
                "target": mirror.target().display().to_string(),
                "source_exists": plan.source_exists,
                "replaces_target": plan.replaces_target,
                "files": plan.files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>(),
            }))?,
            OutputFormat::Human => {
                if !plan.source_exists {
                    println!("Nothing to sync: {} does not exist", mirror.source().display());
                    return Ok(());
                }
                if plan.replaces_target {
                    println!("Would delete {}", mirror.target().display());
                }
                println!(
                    "Would copy {} files to {}",
                    plan.files.len(),
                    mirror.target().display()
                );
                if !cli.quiet {
                    for file in &plan.files {
                        println!("  {}", file.display());
                    }
                }
            }
        }
        return Ok(());
    }

    let outcome = mirror.run()?;
    let files = match outcome {
        SyncOutcome::Mirrored { files } => Some(files),
        SyncOutcome::SourceMissing => None,
    };

    match cli.format {
        OutputFormat::Json => print_json(&json!({
            "dry_run": false,
            "source": mirror.source().display().to_string(),
            "target": mirror.target().display().to_string(),
            "source_exists": files.is_some(),
            "files": files,
        }))?,
        OutputFormat::Human => {
            if !cli.quiet {
                match files {
                    Some(files) => {
                        println!("Synced {} files to {}", files, mirror.target().display())
                    }
                    None => println!(
                        "Nothing to sync: {} does not exist",
                        mirror.source().display()
                    ),
                }
            }
        }
    }

    Ok(())
}
