//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CatCommand, CompletionsCommand, ExtractCommand, LsCommand, ResolveCommand,
    ShowConfigCommand, StatCommand, ValidateCommand,
};
use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Inspect and extract packaged resources through a private on-disk cache.
#[derive(Parser)]
#[command(name = "rescache")]
#[command(
    version,
    about = "Inspect and extract packaged resources",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Resource source to search: a directory or a tar archive (repeatable,
    /// searched in order before configured sources)
    #[arg(
        long = "source",
        short = 's',
        value_name = "PATH",
        value_hint = ValueHint::AnyPath,
        global = true
    )]
    pub sources: Vec<PathBuf>,

    /// Directory the cache root is created in
    #[arg(long, value_name = "PATH", value_hint = ValueHint::DirPath, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Extract afresh on every resolution instead of reusing cached entries
    #[arg(long, global = true)]
    pub disable_caching: bool,

    /// Override the directory holding the user configuration
    #[arg(
        long,
        value_name = "PATH",
        value_hint = ValueHint::DirPath,
        global = true,
        env = "RESCACHE_DATA_DIR"
    )]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Write a resource's bytes to stdout
    Cat(CatCommand),

    /// List the children of a resource directory
    Ls(LsCommand),

    /// Show metadata about a resource
    Stat(StatCommand),

    /// Print the on-disk path a resource resolves to
    Resolve(ResolveCommand),

    /// Copy a resource or resource tree out of the cache
    Extract(ExtractCommand),

    /// Print the effective configuration
    ShowConfig(ShowConfigCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
