//! `static-notes login`, `logout` and `status`

use chrono::Local;
use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;
use static_notes_core::auth::AdminAuth;
use static_notes_core::config::Config;
use static_notes_core::error::Result;
use static_notes_core::pending::PendingNotes;

pub fn login(cli: &Cli, auth: &AdminAuth, password: &str) -> Result<()> {
    let session = auth.login(password)?;
    match cli.format {
        OutputFormat::Json => print_json(&serde_json::to_value(&session)?)?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Logged in");
            }
        }
    }
    Ok(())
}

pub fn logout(cli: &Cli, auth: &AdminAuth) -> Result<()> {
    auth.logout()?;
    match cli.format {
        OutputFormat::Json => print_json(&json!({ "isAuthenticated": false }))?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Logged out");
            }
        }
    }
    Ok(())
}

pub fn status(cli: &Cli, config: &Config, auth: &AdminAuth) -> Result<()> {
    let session = auth.current();
    let pending = PendingNotes::load(&config.pending_path());
    let counters = pending.status();

    match cli.format {
        OutputFormat::Json => print_json(&json!({
            "session": session,
            "pending": pending.len(),
            "building": counters.building,
            "completed": counters.completed,
            "failed": counters.failed,
        }))?,
        OutputFormat::Human => {
            match &session {
                Some(session) => println!(
                    "Logged in since {}",
                    session
                        .authenticated_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                ),
                None => println!("Not logged in"),
            }
            println!("Pending notes: {}", pending.len());
            println!(
                "Builds: {} running, {} completed, {} failed",
                counters.building, counters.completed, counters.failed
            );
        }
    }
    Ok(())
}
