use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "msu-rs", version, about = "Refresh live stream URLs in an M3U playlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the live stream URL and patch the playlist file
    Update(UpdateOptions),
    /// Run the update, then commit and push the playlist if it changed
    Commit(UpdateOptions),
}

/// Options shared by the updater and the committer. Parsed once; the
/// committer reads `file` from the same record the updater consumes.
#[derive(Args, Clone, Debug)]
pub struct UpdateOptions {
    /// URL of the web page to fetch the m3u8 link from
    #[arg(long)]
    pub url: String,

    /// Path to the m3u playlist file to update
    #[arg(long)]
    pub file: PathBuf,

    /// Name of the playlist entry to update
    #[arg(long)]
    pub entry_name: String,

    /// Prefer manifest URLs from this domain when several are found
    #[arg(long)]
    pub preferred_domain: Option<String>,

    /// Strip query parameters from the manifest URL before writing it
    #[arg(long, default_value_t = false)]
    pub strip_parameters: bool,
}
