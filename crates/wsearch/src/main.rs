mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Query { query, url, json } => commands::query::run(&query, &url, json),
        Commands::Grep {
            query,
            workspace,
            json,
        } => commands::grep::run(&query, workspace, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
