//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;
use shelfguard_core::ApiUrl;

use crate::commands::Command;

/// Session client for the book-network API.
#[derive(Parser, Debug)]
#[command(name = "shelfguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(long, env = "SHELFGUARD_API", default_value = ApiUrl::LOCAL_DEFAULT, global = true)]
    pub api: String,

    /// Directory holding the stored session
    #[arg(long, env = "SHELFGUARD_SESSION_DIR", global = true)]
    pub session_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}
