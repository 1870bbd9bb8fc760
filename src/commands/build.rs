//! `static-notes build` - compile notes and write the manifest

use serde_json::json;
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;
use static_notes_core::artifacts::ArtifactWriter;
use static_notes_core::config::Config;
use static_notes_core::error::Result;
use static_notes_core::pending::PendingNotes;
use static_notes_core::pipeline::{BuildPipeline, BuildReport};
use static_notes_core::source;
use static_notes_core::sync::{MirrorSync, SyncOutcome};

/// Run the pipeline against the configured source and reconcile pending notes
pub fn run_build(config: &Config) -> Result<BuildReport> {
    let source = source::open(config)?;
    let writer = ArtifactWriter::new(&config.output_dir);
    let report = BuildPipeline::new(source.as_ref(), &writer).run()?;

    let pending_path = config.pending_path();
    let mut pending = PendingNotes::load(&pending_path);
    let caught_up = pending.reconcile(&report.manifest);
    if !caught_up.is_empty() {
        info!(count = caught_up.len(), "Pending notes now built");
        pending.save(&pending_path)?;
    }

    Ok(report)
}

/// Execute the build command
pub fn execute(cli: &Cli, config: &Config, sync: bool) -> Result<()> {
    let report = run_build(config)?;

    let synced = if sync {
        Some(MirrorSync::new(&config.output_dir, &config.public_dir).run()?)
    } else {
        None
    };

    match cli.format {
        OutputFormat::Json => {
            let failures: Vec<_> = report
                .failures()
                .map(|(filename, reason)| json!({ "filename": filename, "reason": reason }))
                .collect();
            print_json(&json!({
                "status": "ok",
                "output_dir": config.output_dir.display().to_string(),
                "total_notes": report.manifest.total_notes,
                "public_notes": report.manifest.public_notes,
                "compiled": report.compiled_count(),
                "skipped": report.skipped_count(),
                "failures": failures,
                "pruned": report.pruned,
                "synced_files": match synced {
                    Some(SyncOutcome::Mirrored { files }) => json!(files),
                    _ => serde_json::Value::Null,
                },
            }))?;
        }
        OutputFormat::Human => {
            for (filename, reason) in report.failures() {
                eprintln!("warning: {}: {}", filename, reason);
            }
            if !cli.quiet {
                println!(
                    "Compiled {} notes, skipped {} ({} public of {})",
                    report.compiled_count(),
                    report.skipped_count(),
                    report.manifest.public_notes,
                    report.manifest.total_notes
                );
                if !report.pruned.is_empty() {
                    println!("Pruned {} stale artifacts", report.pruned.len());
                }
                match synced {
                    Some(SyncOutcome::Mirrored { files }) => {
                        println!("Synced {} files to {}", files, config.public_dir.display())
                    }
                    Some(SyncOutcome::SourceMissing) => println!("Nothing to sync"),
                    None => {}
                }
            }
        }
    }

    Ok(())
}
