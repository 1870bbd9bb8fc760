//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::paths::rooted;
use crate::cli::Cli;
use static_notes_core::auth::AdminAuth;
use static_notes_core::config::Config;
use static_notes_core::error::Result;
use tracing::debug;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    /// Resolve configuration from the config file and environment
    pub fn config(&self) -> Result<Config> {
        let path = self.cli.config.as_deref().map(|p| rooted(self.root, p));
        let config = Config::load(self.root, path.as_deref())?;
        debug!(elapsed = ?self.start.elapsed(), "load_config");
        Ok(config)
    }

    pub fn auth(&self, config: &Config) -> AdminAuth {
        AdminAuth::new(config.admin_password.clone(), config.session_path())
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("static-notes {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Compile a Markdown notes repository into static JSON.");
        println!();
        println!("Run `static-notes --help` for usage information.");
        Ok(())
    }
}
