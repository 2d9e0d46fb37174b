mod cli;
mod commands;
mod host;

use clap::Parser;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create(args) => commands::create(args),
        Commands::Restore(args) => commands::restore(args),
        Commands::Info(args) => commands::info(args),
        Commands::List(args) => commands::list(args),
    }
}
