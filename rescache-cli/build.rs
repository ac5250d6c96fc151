//! Build script for rescache-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("rescache")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and extract packaged resources")
        .long_about(
            "Resolves resources from directories and tar archives through a private on-disk cache",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Resource source to search: a directory or a tar archive (repeatable)")
                .value_name("PATH")
                .global(true)
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .help("Directory the cache root is created in")
                .value_name("PATH")
                .global(true),
        )
        .arg(
            Arg::new("disable-caching")
                .long("disable-caching")
                .help("Extract afresh on every resolution")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the directory holding the user configuration")
                .value_name("PATH")
                .global(true)
                .env("RESCACHE_DATA_DIR"),
        )
        .subcommands(vec![
            Command::new("cat")
                .about("Write a resource's bytes to stdout")
                .long_about("Resolve a resource and write its contents to standard output"),
            Command::new("ls")
                .about("List the children of a resource directory")
                .long_about("List a resource directory as a table, JSON, CSV or TSV"),
            Command::new("stat")
                .about("Show metadata about a resource")
                .long_about("Show kind, size, modification time and resolved path of a resource"),
            Command::new("resolve")
                .about("Print the on-disk path a resource resolves to")
                .long_about("Print the cache path a resource resolves to, or the path as given"),
            Command::new("extract")
                .about("Copy a resource or resource tree out of the cache")
                .long_about("Materialize a resource or directory and copy it to a destination"),
            Command::new("show-config")
                .about("Print the effective configuration")
                .long_about("Print the merged configuration from files, environment and flags"),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a rescache configuration file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Write the script to this file instead of stdout"),
                ),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("rescache.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
