//! Subcommands and their arguments

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile notes into static JSON artifacts
    Build(BuildArgs),

    /// Mirror the build output into the public directory
    Sync(SyncArgs),

    /// List source notes (name, hash, size)
    List,

    /// List compiled notes merged with pending ones
    Notes,

    /// Read the manifest or notes through the static reader
    Fetch(FetchArgs),

    /// Start an admin session
    Login(LoginArgs),

    /// End the admin session
    Logout,

    /// Show the admin session and pending-note counters
    Status,

    /// Commit a note to the repository (admin)
    Publish(PublishArgs),

    /// Delete a note from the repository (admin)
    Unpublish(UnpublishArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Mirror the output into the public directory afterwards
    #[arg(long)]
    pub sync: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Show what would be copied without touching anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Note file names (the manifest when omitted)
    pub filenames: Vec<String>,

    /// Base URL the artifacts are served from
    #[arg(long, conflicts_with = "dev_port")]
    pub base_url: Option<String>,

    /// Local dev server port
    #[arg(long)]
    pub dev_port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin password
    #[arg(long, env = "STATIC_NOTES_LOGIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Local Markdown file to publish
    pub file: PathBuf,

    /// Repository path (defaults to <notes path>/<file name>)
    #[arg(long)]
    pub path: Option<String>,

    /// Commit message
    #[arg(long, short)]
    pub message: Option<String>,

    /// Run a build afterwards
    #[arg(long)]
    pub rebuild: bool,
}

#[derive(Args, Debug)]
pub struct UnpublishArgs {
    /// Repository path of the note
    pub path: String,

    /// Commit message
    #[arg(long, short)]
    pub message: Option<String>,
}
