//! Command implementations for all static-notes commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{build, fetch, list, notes, publish, session, sync};
use static_notes_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let cli = ctx.cli;
        let config = ctx.config()?;

        match self {
            Commands::Build(args) => build::execute(cli, &config, args.sync),
            Commands::Sync(args) => sync::execute(cli, &config, args.dry_run),
            Commands::List => list::execute(cli, &config),
            Commands::Notes => notes::execute(cli, &config),
            Commands::Fetch(args) => fetch::execute(cli, &config, args),
            Commands::Login(args) => session::login(cli, &ctx.auth(&config), &args.password),
            Commands::Logout => session::logout(cli, &ctx.auth(&config)),
            Commands::Status => session::status(cli, &config, &ctx.auth(&config)),
            Commands::Publish(args) => publish::publish(cli, &config, &ctx.auth(&config), args),
            Commands::Unpublish(args) => {
                publish::unpublish(cli, &config, &ctx.auth(&config), args)
            }
        }
    }
}
