//! Main entry point for the rescache CLI.
//!
//! Every command builds a resolver over the configured resource sources,
//! does its work through the resolver's private cache root, and removes the
//! cache root before exiting:
//! - `cat`: Write a resource's bytes to stdout
//! - `ls`: List the children of a resource directory
//! - `stat`: Show metadata about a resource
//! - `extract`: Copy a resource tree out of the cache

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    if rescache::init_logger(cli.verbose, cli.quiet).install().is_err() {
        eprintln!("Warning: a logger was already installed");
    }

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        sources: cli.sources,
        cache_dir: cli.cache_dir,
        disable_caching: cli.disable_caching,
        data_dir: cli.data_dir,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Cat(cmd) => cmd.execute(&global),
        cli::Command::Ls(cmd) => cmd.execute(&global),
        cli::Command::Stat(cmd) => cmd.execute(&global),
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Extract(cmd) => cmd.execute(&global),
        cli::Command::ShowConfig(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
