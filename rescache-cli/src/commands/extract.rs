//! Command to copy a resource or a resource tree out of the cache.

use crate::error::CliError;
use crate::utils::{close_file_system, load_configuration, open_file_system, GlobalOptions};
use clap::Args;
use rescache::ResolvedEntry;
use std::fs;
use std::path::{Path, PathBuf};

/// Copy a resource or resource tree out of the cache.
///
/// A file is copied to DEST, or into DEST when DEST is an existing
/// directory. A directory is copied recursively to DEST.
#[derive(Args)]
pub struct ExtractCommand {
    /// Logical path of the resource
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Destination path
    #[arg(long, value_name = "DEST")]
    pub to: PathBuf,

    /// Overwrite existing files at the destination
    #[arg(long)]
    pub force: bool,
}

impl ExtractCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let fs = open_file_system(&config)?;

        let copied = match fs.resolver().resolve(&self.path)? {
            ResolvedEntry::File(source) => {
                let dest = if self.to.is_dir() {
                    match source.file_name() {
                        Some(name) => self.to.join(name),
                        None => self.to.clone(),
                    }
                } else {
                    self.to.clone()
                };
                copy_file(&source, &dest, self.force)?;
                1
            }
            ResolvedEntry::Directory(source) => copy_tree(&source, &self.to, self.force)?,
            ResolvedEntry::Missing(_) => {
                return Err(CliError::NotFound(self.path.display().to_string()));
            }
        };

        close_file_system(&fs)?;

        if !global.quiet {
            eprintln!(
                "Extracted {copied} file{} to {}",
                if copied == 1 { "" } else { "s" },
                self.to.display()
            );
        }
        Ok(())
    }
}

fn copy_file(source: &Path, dest: &Path, force: bool) -> Result<(), CliError> {
    if dest.exists() && !force {
        return Err(CliError::InvalidArguments(format!(
            "{} already exists (use --force to overwrite)",
            dest.display()
        )));
    }
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::copy(source, dest)?;
    Ok(())
}

/// Copies the tree under `source` to `dest`, returning the number of files.
fn copy_tree(source: &Path, dest: &Path, force: bool) -> Result<usize, CliError> {
    if dest.exists() && !dest.is_dir() {
        return Err(CliError::InvalidArguments(format!(
            "{} exists and is not a directory",
            dest.display()
        )));
    }
    fs::create_dir_all(dest)?;

    let mut copied = 0;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_tree(&entry.path(), &target, force)?;
        } else {
            copy_file(&entry.path(), &target, force)?;
            copied += 1;
        }
    }
    Ok(copied)
}
