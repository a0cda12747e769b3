//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wsearch_core::config::consts;

#[derive(Parser)]
#[command(name = "wsearch")]
#[command(version, about = "Full-text search over a workspace directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve workspace search over WebSocket
    Serve(ServeArgs),

    /// Submit one query to a running server
    Query {
        /// Text to look for (case-insensitive)
        query: String,

        /// Server URL
        #[arg(long, env = "WSEARCH_URL", default_value_t = default_url())]
        url: String,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search a directory in-process, without a server
    Grep {
        /// Text to look for (case-insensitive)
        query: String,

        #[command(flatten)]
        workspace: WorkspaceArgs,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Address to listen on (default: the configured bind address)
    #[arg(long, env = "WSEARCH_BIND")]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct WorkspaceArgs {
    /// Workspace root to search (default: current directory)
    #[arg(long, env = "WSEARCH_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file (default: ./wsearch.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn default_url() -> String {
    format!("ws://{}", consts::server::DEFAULT_BIND)
}
