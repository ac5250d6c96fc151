//! Completions command implementation.
//!
//! Renders a completion script for the `rescache` binary. Path-valued
//! options (`--source`, `--cache-dir`, `--data-dir`) carry value hints, so
//! shells that understand them complete directories and archives there.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the installed binary.
const BIN_NAME: &str = "rescache";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Where each shell conventionally picks up a completion script.
fn install_location(shell: Shell) -> Option<&'static str> {
    match shell {
        Shell::Bash => Some("~/.local/share/bash-completion/completions/rescache"),
        Shell::Zsh => Some("a directory on $fpath, as _rescache"),
        Shell::Fish => Some("~/.config/fish/completions/rescache.fish"),
        Shell::PowerShell => Some("a file dot-sourced from $PROFILE"),
        _ => None,
    }
}

/// Renders the completion script for `shell`.
fn render(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut script = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut script);
    script
}

fn write_script(path: &Path, script: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, script)?;
    Ok(())
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let script = render(self.shell);

        match &self.output {
            Some(path) => {
                write_script(path, &script)?;
                if !global.quiet {
                    eprintln!("Wrote {} completions to {}", self.shell, path.display());
                }
            }
            None => {
                if !global.quiet {
                    if let Some(location) = install_location(self.shell) {
                        eprintln!("# Save this {} script to {location}", self.shell);
                    }
                }
                io::stdout().write_all(&script)?;
            }
        }
        Ok(())
    }
}
