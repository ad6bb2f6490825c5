//! ravefx CLI
//!
//! Command-line interface for the ravefx demo engine.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use ravefx::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("ravefx v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("ravefx v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Apply {
            input,
            output,
            model,
        } => commands::apply(&input, &output, &model),
        Commands::Infer {
            input,
            output,
            model,
            mock,
        } => commands::infer(&input, &output, &model, mock),
        Commands::Models { dir } => commands::models(dir.as_deref()),
        Commands::Tone {
            output,
            freq,
            secs,
            rate,
        } => commands::tone(&output, freq, secs, rate),
        Commands::Clean => commands::clean(),
    }
}
