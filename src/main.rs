//! cpwatch - compile and run competitive-programming solutions on save.

mod cli;
mod config;
mod core;
mod endpoint;
mod logger;
mod precompile;
mod runner;
mod supervisor;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{Config, init_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(Config::load(&cli)?);

    match &cli.command {
        None | Some(Commands::Serve { .. }) => cli::serve::serve(config, &cli),
        Some(Commands::Run { file, interactive }) => {
            if !cli::run::run_file(file, *interactive, &config) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Stop) => {
            cli::stop::stop_instance(&config);
            Ok(())
        }
        Some(Commands::Precompile { force }) => match precompile::run(&config, *force) {
            precompile::Outcome::Failed => std::process::exit(1),
            _ => Ok(()),
        },
        Some(Commands::Watch) => cli::watch::run_worker(config, cli.verbose),
    }
}
