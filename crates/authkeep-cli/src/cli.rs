//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Command;

/// Log in to an authentication API and keep the session between runs.
#[derive(Parser, Debug)]
#[command(name = "authkeep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the API lives and where the session is kept.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Base URL of the authentication API
    #[arg(
        long,
        env = "AUTHKEEP_API_URL",
        default_value = "http://localhost:8080/",
        global = true
    )]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "AUTHKEEP_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Directory holding the persisted session (defaults to the user data dir)
    #[arg(long, env = "AUTHKEEP_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}
