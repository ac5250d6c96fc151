//! Command to show the on-disk path a resource resolves to.

use crate::error::CliError;
use crate::utils::{close_file_system, load_configuration, open_file_system, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Print the on-disk path a resource resolves to.
///
/// The cache root is removed when the command exits, so the printed path is
/// for inspection only. A missing resource prints the path as given.
#[derive(Args)]
pub struct ResolveCommand {
    /// Logical path of the resource
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

impl ResolveCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let fs = open_file_system(&config)?;

        let entry = fs.resolver().resolve(&self.path)?;
        println!("{}", entry.path().display());
        let exists = entry.exists() || entry.path().exists();
        close_file_system(&fs)?;

        if exists {
            Ok(())
        } else {
            Err(CliError::NotFound(self.path.display().to_string()))
        }
    }
}
