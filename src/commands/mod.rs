//! CLI commands for static-notes

pub mod build;
pub mod dispatch;
pub mod fetch;
pub mod list;
pub mod notes;
pub mod publish;
pub mod session;
pub mod sync;

use static_notes_core::error::Result;

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
