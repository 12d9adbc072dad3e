//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// Compile and run on save, materialize problems from the browser
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the working directory)
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch for saves and listen for problems from the browser
    #[command(visible_alias = "s")]
    Serve {
        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Compile and run a single source file once
    #[command(visible_alias = "r")]
    Run {
        /// Source file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// The run owns the terminal (set by the watcher for interactive runs)
        #[arg(long, hide = true)]
        interactive: bool,
    },

    /// Ask a running instance to exit
    Stop,

    /// Warm the precompiled header cache
    Precompile {
        /// Rebuild even if the cached header is fresh
        #[arg(short, long)]
        force: bool,
    },

    /// Watcher worker (spawned by `serve`)
    #[command(hide = true)]
    Watch,
}

impl Cli {
    /// Port given on the command line, if any.
    pub fn port_override(&self) -> Option<u16> {
        match &self.command {
            Some(Commands::Serve { port }) => *port,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::parse_from(["cpwatch"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::parse_from(["cpwatch", "s", "--port", "4000"]);
        assert_eq!(cli.port_override(), Some(4000));

        let cli = Cli::parse_from(["cpwatch", "stop"]);
        assert_eq!(cli.port_override(), None);
    }

    #[test]
    fn test_run_with_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "cpwatch",
            "run",
            "a.cpp",
            "-C",
            "/cp/cpwatch.toml",
            "--interactive",
            "--verbose",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("/cp/cpwatch.toml"));
        match cli.command {
            Some(Commands::Run { file, interactive }) => {
                assert_eq!(file, PathBuf::from("a.cpp"));
                assert!(interactive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
