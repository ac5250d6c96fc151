//! Command to write a resource's bytes to stdout.

use crate::error::CliError;
use crate::utils::{close_file_system, load_configuration, open_file_system, GlobalOptions};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

/// Write a resource's bytes to stdout.
#[derive(Args)]
pub struct CatCommand {
    /// Logical path of the resource
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

impl CatCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let fs = open_file_system(&config)?;

        let props = fs.props(&self.path)?;
        if props.is_directory {
            return Err(CliError::InvalidArguments(format!(
                "{} is a directory",
                self.path.display()
            )));
        }

        let mut file = fs.open(&self.path)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        io::copy(&mut file, &mut handle)?;
        handle.flush()?;

        close_file_system(&fs)
    }
}
